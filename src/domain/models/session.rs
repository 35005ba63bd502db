/// Backend assigned conversation identifier. Lives for a single run of the
/// client and is never persisted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    id: Option<String>,
}

impl Session {
    pub fn id(&self) -> Option<&str> {
        return self.id.as_deref();
    }

    /// Stores the identifier if none has been assigned yet. Returns false when
    /// the session already had an identifier, which is kept.
    pub fn assign(&mut self, id: &str) -> bool {
        if self.id.is_some() {
            return false;
        }

        self.id = Some(id.to_string());
        return true;
    }
}
