use serde::Serialize;

/// What the scanner hands to a notifier: the chosen release for one
/// project. `updated` is the RFC 3339 rendering of the entry timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationPayload {
    pub project_name: String,
    pub title: String,
    pub link: String,
    pub updated: String,
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("LARK_WEBHOOK_URL is not configured")]
    MissingWebhookUrl,
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("webhook rejected message: {status} - {body}")]
    Rejected { status: u16, body: String },
}

/// Delivery collaborator. Failures are reported to the caller, which logs
/// and moves on; nothing here retries or aborts the scan.
#[allow(async_fn_in_trait)]
pub trait Notifier {
    async fn notify(&self, payload: &NotificationPayload) -> Result<(), NotifyError>;
}

#[derive(Debug, Serialize)]
struct LarkMessage {
    msg_type: &'static str,
    card: LarkCard,
}

#[derive(Debug, Serialize)]
struct LarkCard {
    config: CardConfig,
    elements: Vec<CardElement>,
}

#[derive(Debug, Serialize)]
struct CardConfig {
    wide_screen_mode: bool,
}

#[derive(Debug, Serialize)]
#[serde(tag = "tag", rename_all = "lowercase")]
enum CardElement {
    Div { text: CardText },
    Hr,
    Action { actions: Vec<CardButton> },
}

#[derive(Debug, Serialize)]
struct CardText {
    content: String,
    tag: &'static str,
}

#[derive(Debug, Serialize)]
struct CardButton {
    tag: &'static str,
    text: CardText,
    #[serde(rename = "type")]
    kind: &'static str,
    url: String,
}

/// Posts an interactive card to a Lark group webhook.
#[derive(Debug, Clone)]
pub struct LarkNotifier {
    client: reqwest::Client,
    webhook_url: Option<String>,
}

impl LarkNotifier {
    pub fn new(client: reqwest::Client, webhook_url: Option<String>) -> Self {
        Self {
            client,
            webhook_url,
        }
    }

    fn build_card(payload: &NotificationPayload) -> LarkMessage {
        let body = format!(
            "**Project:** {}\n\n**New Release:** {}\n\n**Updated:** {}\n\n[View Release]({})",
            payload.project_name, payload.title, payload.updated, payload.link
        );
        LarkMessage {
            msg_type: "interactive",
            card: LarkCard {
                config: CardConfig {
                    wide_screen_mode: true,
                },
                elements: vec![
                    CardElement::Div {
                        text: CardText {
                            content: body,
                            tag: "lark_md",
                        },
                    },
                    CardElement::Hr,
                    CardElement::Action {
                        actions: vec![CardButton {
                            tag: "button",
                            text: CardText {
                                content: "Open Release".to_string(),
                                tag: "plain_text",
                            },
                            kind: "primary",
                            url: payload.link.clone(),
                        }],
                    },
                ],
            },
        }
    }
}

impl Notifier for LarkNotifier {
    async fn notify(&self, payload: &NotificationPayload) -> Result<(), NotifyError> {
        let url = self
            .webhook_url
            .as_deref()
            .ok_or(NotifyError::MissingWebhookUrl)?;
        let response = self
            .client
            .post(url)
            .json(&Self::build_card(payload))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}
