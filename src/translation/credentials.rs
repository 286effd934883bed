/*!
 * Round-robin credential rotation.
 */

use log::debug;
use parking_lot::Mutex;

use crate::errors::TranslationError;

/// Fixed pool of API credentials with a shared rotation cursor
///
/// The cursor advances once per remote-call attempt, retries included, and
/// wraps modulo the pool size. Workers share one rotator behind an `Arc`;
/// the cursor is only touched under its mutex.
#[derive(Debug)]
pub struct CredentialRotator {
    /// Credentials in rotation order
    keys: Vec<String>,
    /// Index of the next credential to hand out
    cursor: Mutex<usize>,
}

impl CredentialRotator {
    /// Create a rotator over `keys`
    pub fn new(keys: Vec<String>) -> Result<Self, TranslationError> {
        if keys.is_empty() {
            return Err(TranslationError::EmptyCredentialPool);
        }
        Ok(Self {
            keys,
            cursor: Mutex::new(0),
        })
    }

    /// Return the next credential and advance the cursor
    pub fn next(&self) -> String {
        let mut cursor = self.cursor.lock();
        let index = *cursor;
        *cursor = (index + 1) % self.keys.len();
        debug!("Using credential {}/{}", index + 1, self.keys.len());
        self.keys[index].clone()
    }

    /// Number of credentials in the pool
    pub fn pool_size(&self) -> usize {
        self.keys.len()
    }
}
