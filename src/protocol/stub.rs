//! Scriptable protocol used to exercise the probe engine without network I/O.

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::error::ProbeError;
use crate::protocol::{Probe, Protocol};

/// Tracks how many attempts run at the same time.
#[derive(Debug, Default)]
pub struct InFlight {
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl InFlight {
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    fn enter(&self) {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    fn leave(&self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
    }
}

#[derive(Clone, Debug)]
pub struct StubProbe {
    pub id: String,
    /// Target reported when the caller passes an empty one.
    pub target: String,
    pub extra: String,
    pub failure: Option<String>,
    pub latency: Duration,
    pub panics: bool,
    pub in_flight: Option<Arc<InFlight>>,
}

impl StubProbe {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            target: format!("{}.stub", id),
            extra: "ok".to_string(),
            failure: None,
            latency: Duration::from_millis(1),
            panics: false,
            in_flight: None,
        }
    }

    pub fn failing(id: &str, message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::new(id)
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_in_flight(mut self, gauge: Arc<InFlight>) -> Self {
        self.in_flight = Some(gauge);
        self
    }

    pub fn panicking(id: &str) -> Self {
        Self {
            panics: true,
            ..Self::new(id)
        }
    }

    pub fn into_protocol(self) -> Protocol {
        Protocol::Stub(self)
    }

    pub async fn probe(&self, target: &str) -> Result<Probe, ProbeError> {
        let target = if target.is_empty() {
            self.target.clone()
        } else {
            target.to_string()
        };
        if let Some(gauge) = &self.in_flight {
            gauge.enter();
        }
        tokio::time::sleep(self.latency).await;
        if let Some(gauge) = &self.in_flight {
            gauge.leave();
        }
        if self.panics {
            panic!("stub protocol {} panicked", self.id);
        }
        match &self.failure {
            Some(message) => Err(ProbeError::Connect {
                target,
                source: io::Error::other(message.clone()),
            }),
            None => Ok(Probe {
                target,
                extra: self.extra.clone(),
            }),
        }
    }
}
