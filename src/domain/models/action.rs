/// A message submission, numbered in the order the user sent it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SendRequest {
    pub seq: u64,
    pub text: String,
    pub conversation_id: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    StartSession(),
    SendMessage(SendRequest),
}
