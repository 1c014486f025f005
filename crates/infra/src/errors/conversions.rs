//! Conversions from external infrastructure errors into port errors.

use beaconlink_core::TransportError;
use reqwest::Error as HttpError;

/// Extension trait keeping the reqwest-specific mapping on the infra side
pub(crate) trait IntoTransportError {
    fn into_transport(self) -> TransportError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → TransportError */
/* -------------------------------------------------------------------------- */

impl IntoTransportError for HttpError {
    fn into_transport(self) -> TransportError {
        if self.is_timeout() {
            return TransportError::Timeout(self.to_string());
        }

        if self.is_connect() {
            return TransportError::Connect(self.to_string());
        }

        if self.is_builder() {
            return TransportError::InvalidRequest(self.to_string());
        }

        TransportError::Io(self.to_string())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
