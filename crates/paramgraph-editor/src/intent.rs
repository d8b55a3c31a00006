//! Requests to open collaborator flows outside the canvas.
//!
//! The editor does not own the parameter form or the visibility dialog; it
//! announces an [`Intent`] and whoever owns those flows reacts.

use serde::Serialize;
use tokio::sync::mpsc;

use paramgraph_core::{Parameter, ParameterId};

/// A request for a collaborator flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Intent {
    /// Open the parameter editor for `parameter`.
    EditParameter {
        parameter: Parameter,
        is_editing: bool,
    },
    /// Open visibility configuration for a dependency child.
    ConfigureVisibility { parameter_id: ParameterId },
}

/// Receives intents raised by the editor.
pub trait IntentDispatcher: Send + Sync {
    fn dispatch(&self, intent: Intent);
}

/// Forwards intents over an unbounded tokio channel.
#[derive(Debug, Clone)]
pub struct ChannelDispatcher {
    tx: mpsc::UnboundedSender<Intent>,
}

impl ChannelDispatcher {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Intent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (ChannelDispatcher { tx }, rx)
    }
}

impl IntentDispatcher for ChannelDispatcher {
    fn dispatch(&self, intent: Intent) {
        if self.tx.send(intent).is_err() {
            tracing::debug!("intent receiver dropped");
        }
    }
}

/// Logs and discards intents; used when no collaborator is attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct IgnoreIntents;

impl IntentDispatcher for IgnoreIntents {
    fn dispatch(&self, intent: Intent) {
        tracing::debug!(?intent, "no intent dispatcher attached");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intents_serialize_with_a_type_tag() {
        let parameter_id = ParameterId::generate();
        let json = serde_json::to_value(Intent::ConfigureVisibility { parameter_id }).unwrap();
        assert_eq!(json["type"], "configure_visibility");
        assert_eq!(json["parameter_id"], parameter_id.to_string());
    }

    #[test]
    fn channel_dispatcher_forwards() {
        let (dispatcher, mut rx) = ChannelDispatcher::new();
        let parameter_id = ParameterId::generate();
        dispatcher.dispatch(Intent::ConfigureVisibility { parameter_id });
        assert_eq!(
            rx.try_recv().unwrap(),
            Intent::ConfigureVisibility { parameter_id }
        );
    }
}
