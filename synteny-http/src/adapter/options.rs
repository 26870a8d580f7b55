use futures::future::AbortRegistration;

/// Per-request options.
#[derive(Debug, Default)]
pub struct Options {
    pub(super) abort_registration: Option<AbortRegistration>,
}

impl Options {
    /// Sets the abort registration used to cancel the request.
    ///
    /// Aborting the paired [`futures::future::AbortHandle`] ends the request with
    /// [`crate::Error::Aborted`]. If the request started the underlying fetch, the fetch is
    /// cancelled for every caller waiting on it. If the request only joined a fetch already in
    /// flight, only this request ends.
    pub fn set_abort_registration(mut self, abort_registration: AbortRegistration) -> Self {
        self.abort_registration = Some(abort_registration);
        self
    }
}
