use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use tracing::{
  debug,
  warn
};

pub const ACCESS_TOKEN_KEY: &str =
  "access_token";
pub const REFRESH_TOKEN_KEY: &str =
  "refresh_token";

#[derive(Debug, Clone, thiserror::Error)]
pub enum StorageError {
  #[error("storage unavailable: {0}")]
  Unavailable(String),
  #[error("storage write failed: {0}")]
  Write(String)
}

/// Persistent string storage keyed by well-known names.
pub trait KeyValueStorage {
  fn get(
    &self,
    key: &str
  ) -> Result<Option<String>, StorageError>;

  fn set(
    &self,
    key: &str,
    value: &str
  ) -> Result<(), StorageError>;

  fn remove(
    &self,
    key: &str
  ) -> Result<(), StorageError>;
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
  values: RefCell<BTreeMap<String, String>>
}

impl KeyValueStorage for MemoryStorage {
  fn get(
    &self,
    key: &str
  ) -> Result<Option<String>, StorageError>
  {
    Ok(self.values.borrow().get(key).cloned())
  }

  fn set(
    &self,
    key: &str,
    value: &str
  ) -> Result<(), StorageError> {
    self
      .values
      .borrow_mut()
      .insert(key.to_string(), value.to_string());
    Ok(())
  }

  fn remove(
    &self,
    key: &str
  ) -> Result<(), StorageError> {
    self.values.borrow_mut().remove(key);
    Ok(())
  }
}

/// Bearer credential holder. Cheap to clone; every clone shares the same
/// backing storage.
///
/// None of these methods fail: storage trouble is logged and the session
/// behaves as if the value were absent.
#[derive(Clone)]
pub struct Session {
  storage: Rc<dyn KeyValueStorage>
}

impl Session {
  pub fn new(
    storage: Rc<dyn KeyValueStorage>
  ) -> Self {
    Self { storage }
  }

  pub fn in_memory() -> Self {
    Self::new(Rc::new(MemoryStorage::default()))
  }

  #[tracing::instrument(skip_all)]
  pub fn set_credential(
    &self,
    access: &str,
    refresh: &str
  ) {
    for (key, value) in [
      (ACCESS_TOKEN_KEY, access),
      (REFRESH_TOKEN_KEY, refresh)
    ] {
      if let Err(error) =
        self.storage.set(key, value)
      {
        warn!(key, %error, "failed persisting session value");
      }
    }
    debug!("session credential stored");
  }

  pub fn access_token(
    &self
  ) -> Option<String> {
    self.read(ACCESS_TOKEN_KEY)
  }

  pub fn refresh_token(
    &self
  ) -> Option<String> {
    self.read(REFRESH_TOKEN_KEY)
  }

  pub fn is_authenticated(&self) -> bool {
    self.access_token().is_some()
  }

  #[tracing::instrument(skip_all)]
  pub fn clear(&self) {
    for key in
      [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY]
    {
      if let Err(error) =
        self.storage.remove(key)
      {
        warn!(key, %error, "failed removing session value");
      }
    }
    debug!("session cleared");
  }

  fn read(
    &self,
    key: &str
  ) -> Option<String> {
    match self.storage.get(key) {
      | Ok(value) => {
        value.filter(|v| !v.is_empty())
      }
      | Err(error) => {
        warn!(key, %error, "failed reading session value");
        None
      }
    }
  }
}

impl std::fmt::Debug for Session {
  fn fmt(
    &self,
    f: &mut std::fmt::Formatter<'_>
  ) -> std::fmt::Result {
    f.debug_struct("Session")
      .field(
        "authenticated",
        &self.is_authenticated()
      )
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  struct BrokenStorage;

  impl KeyValueStorage for BrokenStorage {
    fn get(
      &self,
      _key: &str
    ) -> Result<Option<String>, StorageError>
    {
      Err(StorageError::Unavailable(
        "denied".to_string()
      ))
    }

    fn set(
      &self,
      _key: &str,
      _value: &str
    ) -> Result<(), StorageError> {
      Err(StorageError::Write(
        "quota".to_string()
      ))
    }

    fn remove(
      &self,
      _key: &str
    ) -> Result<(), StorageError> {
      Err(StorageError::Write(
        "quota".to_string()
      ))
    }
  }

  #[test]
  fn credential_lifecycle() {
    let session = Session::in_memory();
    assert_eq!(session.access_token(), None);

    session.set_credential("T1", "T2");
    assert_eq!(
      session.access_token().as_deref(),
      Some("T1")
    );
    assert_eq!(
      session.refresh_token().as_deref(),
      Some("T2")
    );

    session.clear();
    session.clear();
    assert_eq!(session.access_token(), None);
    assert_eq!(session.refresh_token(), None);
  }

  #[test]
  fn clones_share_storage() {
    let session = Session::in_memory();
    let other = session.clone();
    session.set_credential("a", "b");
    assert!(other.is_authenticated());
    other.clear();
    assert!(!session.is_authenticated());
  }

  #[test]
  fn empty_access_token_counts_as_absent() {
    let session = Session::in_memory();
    session.set_credential("", "r");
    assert!(!session.is_authenticated());
  }

  #[test]
  fn storage_failures_are_swallowed() {
    let session =
      Session::new(Rc::new(BrokenStorage));
    session.set_credential("a", "b");
    session.clear();
    assert_eq!(session.access_token(), None);
  }
}
