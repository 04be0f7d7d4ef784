//! Email hand-off over the shared ZeroMQ publisher.

use pushkind_common::zmq::ZmqSender;

use crate::models::zmq::ZmqEmailMessage;
use crate::services::credentials::EmailSender;
use crate::services::{ServiceError, ServiceResult};

impl EmailSender for ZmqSender {
    fn send_email(&self, message: &ZmqEmailMessage) -> ServiceResult<()> {
        self.try_send_json(message)
            .map_err(|e| ServiceError::Internal(format!("zmq send: {e}")))
    }
}
