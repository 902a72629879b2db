//! Channel message envelope.

use super::Exchangeable;

/// Envelope around one handshake body.
#[derive(Debug)]
pub struct Message {
    body: Box<dyn Exchangeable>,
}

impl Message {
    pub fn new(body: impl Exchangeable + 'static) -> Self {
        Self {
            body: Box::new(body),
        }
    }

    pub fn body(&self) -> &dyn Exchangeable {
        self.body.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::diffsync::{ExchangeableType, Start};

    #[test]
    fn message_exposes_body() {
        let message = Message::new(Start {
            entity_name: "activity".to_string(),
        });
        assert_eq!(message.body().exchange_type(), Some(ExchangeableType::Start));
    }
}
