#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Author {
    User,
    Assistant,
}
