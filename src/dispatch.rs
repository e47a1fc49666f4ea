use log::{error, info};

use crate::gateway::{GatewayError, SmsGateway, SmsMessage};
use crate::types::{Appointment, SendSmsResponse};

pub fn delay_message(delay: &str) -> String {
    format!(
        "HeadsUp: your provider is running about {} minutes behind schedule. Thank you for your patience.",
        delay
    )
}

#[derive(Debug)]
pub enum SendOutcome {
    Sent { phone: String, sid: String },
    Failed { phone: String, error: GatewayError },
}

impl SendOutcome {
    pub fn phone(&self) -> &str {
        match self {
            Self::Sent { phone, .. } | Self::Failed { phone, .. } => phone,
        }
    }
}

/// Per-appointment outcomes of one dispatch batch, in input order.
#[derive(Debug, Default)]
pub struct DispatchReport {
    pub outcomes: Vec<SendOutcome>,
}

impl DispatchReport {
    pub fn into_response(self) -> SendSmsResponse {
        let mut response = SendSmsResponse::default();
        for outcome in self.outcomes {
            match outcome {
                SendOutcome::Sent { phone, .. } => response.success.push(phone),
                SendOutcome::Failed { phone, .. } => response.failure.push(phone),
            }
        }
        response
    }
}

/// Sends the delay notice to every appointment, one at a time.
///
/// A rejected send is logged and recorded as `Failed`; the batch always runs to the end.
pub async fn dispatch(
    gateway: &dyn SmsGateway,
    from: &str,
    delay: &str,
    appointments: &[Appointment],
) -> DispatchReport {
    let body = delay_message(delay);
    let mut report = DispatchReport {
        outcomes: Vec::with_capacity(appointments.len()),
    };

    info!(
        "Dispatching {}-minute delay notice to {} appointments",
        delay,
        appointments.len()
    );

    for appointment in appointments {
        let message = SmsMessage {
            from: from.to_string(),
            to: appointment.phone.clone(),
            body: body.clone(),
        };

        let outcome = match gateway.send(&message).await {
            Ok(sent) => SendOutcome::Sent {
                phone: appointment.phone.clone(),
                sid: sent.sid,
            },
            Err(e) => {
                error!("Failed to send SMS to {}: {}", appointment.phone, e);
                SendOutcome::Failed {
                    phone: appointment.phone.clone(),
                    error: e,
                }
            }
        };
        report.outcomes.push(outcome);
    }

    report
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::gateway::SentMessage;

    #[derive(Default)]
    struct RecordingGateway {
        rejected: HashSet<String>,
        sent: Mutex<Vec<SmsMessage>>,
    }

    impl RecordingGateway {
        fn rejecting(phones: &[&str]) -> Self {
            Self {
                rejected: phones.iter().map(|p| p.to_string()).collect(),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl SmsGateway for RecordingGateway {
        async fn send(&self, message: &SmsMessage) -> Result<SentMessage, GatewayError> {
            let mut sent = self.sent.lock().unwrap();
            sent.push(message.clone());
            if self.rejected.contains(&message.to) {
                return Err(GatewayError::Rejected {
                    status: 400,
                    code: Some(21211),
                    message: format!("{} is not a valid phone number", message.to),
                });
            }
            Ok(SentMessage {
                sid: format!("SM{}", sent.len()),
                status: Some("queued".to_string()),
            })
        }
    }

    fn appointments(phones: &[&str]) -> Vec<Appointment> {
        phones
            .iter()
            .enumerate()
            .map(|(i, phone)| Appointment {
                phone: phone.to_string(),
                appointment_time: format!("{}:00", 9 + i),
            })
            .collect()
    }

    #[test]
    fn message_interpolates_delay_only() {
        let body = delay_message("15");
        assert!(body.contains("15 minutes"));
    }

    #[tokio::test]
    async fn all_accepted_keeps_input_order() {
        let gateway = RecordingGateway::default();
        let phones = ["+15550100", "+15550101", "+15550102"];

        let report = dispatch(&gateway, "+15559999", "20", &appointments(&phones)).await;
        let response = report.into_response();

        assert_eq!(response.success, phones);
        assert!(response.failure.is_empty());
    }

    #[tokio::test]
    async fn rejected_subset_lands_in_failure() {
        let gateway = RecordingGateway::rejecting(&["+15550101", "+15550103"]);
        let phones = ["+15550100", "+15550101", "+15550102", "+15550103"];

        let report = dispatch(&gateway, "+15559999", "10", &appointments(&phones)).await;
        assert!(matches!(report.outcomes[1], SendOutcome::Failed { .. }));
        assert_eq!(report.outcomes[2].phone(), "+15550102");

        let response = report.into_response();
        assert_eq!(response.success, ["+15550100", "+15550102"]);
        assert_eq!(response.failure, ["+15550101", "+15550103"]);
        assert_eq!(response.success.len() + response.failure.len(), phones.len());
    }

    #[tokio::test]
    async fn every_send_uses_sender_and_same_body() {
        let gateway = RecordingGateway::default();

        dispatch(&gateway, "+15559999", "45", &appointments(&["+15550100", "+15550101"])).await;

        let sent = gateway.sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        for message in sent.iter() {
            assert_eq!(message.from, "+15559999");
            assert_eq!(message.body, delay_message("45"));
        }
        assert_eq!(sent[0].to, "+15550100");
        assert_eq!(sent[1].to, "+15550101");
    }

    #[tokio::test]
    async fn empty_batch_sends_nothing() {
        let gateway = RecordingGateway::default();

        let response = dispatch(&gateway, "+15559999", "5", &[]).await.into_response();

        assert_eq!(response, SendSmsResponse::default());
        assert!(gateway.sent.lock().unwrap().is_empty());
    }
}
