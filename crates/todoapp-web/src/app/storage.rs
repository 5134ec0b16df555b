use todoapp_core::session::{
  KeyValueStorage,
  StorageError
};

/// `window.localStorage`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorage;

fn local_storage()
-> Result<web_sys::Storage, StorageError> {
  web_sys::window()
    .and_then(|window| {
      window
        .local_storage()
        .ok()
        .flatten()
    })
    .ok_or_else(|| {
      StorageError::Unavailable(
        "local storage is not available"
          .to_string()
      )
    })
}

impl KeyValueStorage for LocalStorage {
  fn get(
    &self,
    key: &str
  ) -> Result<Option<String>, StorageError>
  {
    local_storage()?
      .get_item(key)
      .map_err(|err| {
        StorageError::Unavailable(format!(
          "{err:?}"
        ))
      })
  }

  fn set(
    &self,
    key: &str,
    value: &str
  ) -> Result<(), StorageError> {
    local_storage()?
      .set_item(key, value)
      .map_err(|err| {
        StorageError::Write(format!(
          "{err:?}"
        ))
      })
  }

  fn remove(
    &self,
    key: &str
  ) -> Result<(), StorageError> {
    local_storage()?
      .remove_item(key)
      .map_err(|err| {
        StorageError::Write(format!(
          "{err:?}"
        ))
      })
  }
}
