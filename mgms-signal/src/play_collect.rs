//! PlayCollect signal
//!
//! Entry point for one digit-collection operation: parse the MGCP parameter
//! map, bind the media endpoints, and run the collect state machine on its
//! own task. Parameter and driver errors surface before the operation
//! starts; once started, the operation always resolves to exactly one
//! [`SignalOutcome`].

use crate::asr::AsrBinding;
use crate::collect::context::CollectContext;
use crate::collect::machine::{CollectEvent, CollectMachine, SignalOutcome};
use crate::collect::params::CollectParams;
use crate::error::SignalError;
use crate::media::{DtmfDetector, Player};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::debug;
use uuid::Uuid;

/// A validated, ready-to-run PlayCollect signal.
pub struct PlayCollect {
    operation: Uuid,
    machine: CollectMachine,
    input_tx: mpsc::UnboundedSender<CollectEvent>,
    outcome_rx: oneshot::Receiver<SignalOutcome>,
}

impl PlayCollect {
    /// Validate a PlayCollect request.
    ///
    /// Parses the parameter map and, when an ASR binding is supplied,
    /// configures its engine with the bound driver and language. Any error
    /// here means the operation never starts and no media was touched.
    pub fn new(
        parameters: &BTreeMap<String, String>,
        player: Arc<dyn Player>,
        detector: Arc<dyn DtmfDetector>,
        asr: Option<AsrBinding>,
    ) -> Result<Self, SignalError> {
        let params = CollectParams::parse(parameters)?;
        if let Some(asr) = &asr {
            asr.engine.configure(&asr.driver_name, &asr.language)?;
        }

        let operation = Uuid::new_v4();
        let (outcome_tx, outcome_rx) = oneshot::channel();
        let machine = CollectMachine::new(
            operation,
            CollectContext::new(params),
            player,
            detector,
            asr,
            outcome_tx,
        );
        let input_tx = machine.input_sender();
        Ok(Self {
            operation,
            machine,
            input_tx,
            outcome_rx,
        })
    }

    pub fn operation(&self) -> Uuid {
        self.operation
    }

    /// Start the operation on its own task.
    pub fn start(self) -> PlayCollectHandle {
        debug!(operation = %self.operation, "Starting PlayCollect signal");
        let task = tokio::spawn(self.machine.run());
        PlayCollectHandle {
            operation: self.operation,
            cancel_tx: self.input_tx,
            outcome_rx: self.outcome_rx,
            task,
        }
    }
}

/// Handle to a running PlayCollect operation.
pub struct PlayCollectHandle {
    operation: Uuid,
    cancel_tx: mpsc::UnboundedSender<CollectEvent>,
    outcome_rx: oneshot::Receiver<SignalOutcome>,
    task: JoinHandle<()>,
}

impl PlayCollectHandle {
    pub fn operation(&self) -> Uuid {
        self.operation
    }

    /// Request cancellation. The operation evaluates whatever input it has
    /// collected so far and still resolves with an outcome.
    pub fn cancel(&self) {
        debug!(operation = %self.operation, "Canceling PlayCollect signal");
        let _ = self.cancel_tx.send(CollectEvent::Cancel);
    }

    /// Wait for the terminal outcome of the operation.
    pub async fn outcome(self) -> Result<SignalOutcome, SignalError> {
        let outcome = self.outcome_rx.await.map_err(|_| {
            SignalError::Common(mgms_common::Error::Internal(
                "collect operation ended without an outcome".to_string(),
            ))
        })?;
        let _ = self.task.await;
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::{
        DtmfDetectorListener, ListenerToken, MediaError, PlayerListener,
    };
    use mgms_common::ReturnCode;
    use std::time::Duration;

    struct NullPlayer;

    impl Player for NullPlayer {
        fn set_initial_delay(&self, _delay: Duration) {}
        fn set_url(&self, _url: &str) -> Result<(), MediaError> {
            Ok(())
        }
        fn activate(&self) -> Result<(), MediaError> {
            Ok(())
        }
        fn deactivate(&self) {}
        fn add_listener(
            &self,
            _listener: Arc<dyn PlayerListener>,
        ) -> Result<ListenerToken, MediaError> {
            Ok(ListenerToken::new(0))
        }
        fn remove_listener(&self, _token: ListenerToken) {}
    }

    struct NullDetector;

    impl DtmfDetector for NullDetector {
        fn activate(&self) {}
        fn deactivate(&self) {}
        fn add_listener(
            &self,
            _listener: Arc<dyn DtmfDetectorListener>,
        ) -> Result<ListenerToken, MediaError> {
            Ok(ListenerToken::new(1))
        }
        fn remove_listener(&self, _token: ListenerToken) {}
    }

    fn request(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_bad_parameters_rejected_before_start() {
        let result = PlayCollect::new(
            &request(&[("zz", "1")]),
            Arc::new(NullPlayer),
            Arc::new(NullDetector),
            None,
        );
        assert!(matches!(result, Err(SignalError::UnsupportedParameter(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_silent_caller_times_out_with_no_digits() {
        let signal = PlayCollect::new(
            &request(&[]),
            Arc::new(NullPlayer),
            Arc::new(NullDetector),
            None,
        )
        .unwrap();
        let outcome = signal.start().outcome().await.unwrap();
        assert_eq!(outcome.result, ReturnCode::NoDigits);
        assert_eq!(outcome.digits, "");
        assert_eq!(outcome.attempt, 1);
    }
}
