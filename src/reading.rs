//! Result of one sensor read.
//!
//! The firmware this replaces reported a failed read as `0.0`, which is also a
//! valid temperature and a (theoretical) valid pressure. `Reading` keeps the
//! failure explicit; `or_sentinel` is there for consumers that still want the
//! old numeric contract.

use serde::{Serialize, Serializer};

use crate::error::SensorError;

/// A single sensor value, or the reason it could not be read.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reading<T> {
    Ok(T),
    Failed(SensorError),
}

impl<T: Copy> Reading<T> {
    /// The value, if the read succeeded
    pub fn value(&self) -> Option<T> {
        match self {
            Reading::Ok(value) => Some(*value),
            Reading::Failed(_) => None,
        }
    }

    /// The failure cause, if any
    pub fn error(&self) -> Option<SensorError> {
        match self {
            Reading::Ok(_) => None,
            Reading::Failed(error) => Some(*error),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Reading::Failed(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Reading<U> {
        match self {
            Reading::Ok(value) => Reading::Ok(f(value)),
            Reading::Failed(error) => Reading::Failed(error),
        }
    }
}

impl<T: Copy + Default> Reading<T> {
    /// Legacy numeric form: the value, or `T::default()` (0.0, 0, false) when failed
    pub fn or_sentinel(&self) -> T {
        self.value().unwrap_or_default()
    }
}

impl<T> From<Result<T, SensorError>> for Reading<T> {
    fn from(result: Result<T, SensorError>) -> Self {
        match result {
            Ok(value) => Reading::Ok(value),
            Err(error) => Reading::Failed(error),
        }
    }
}

/// Failed readings go over the wire as `null`
impl<T: Serialize> Serialize for Reading<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Reading::Ok(value) => serializer.serialize_some(value),
            Reading::Failed(_) => serializer.serialize_none(),
        }
    }
}
