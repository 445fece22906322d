use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("qapal.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("qapal.client.request_errors");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("qapal.client.request_duration_seconds");

pub(crate) static SESSION_LOGINS: Counter = Counter::new("qapal.session.logins");
pub(crate) static SESSION_LOGOUTS: Counter = Counter::new("qapal.session.logouts");
pub(crate) static SESSION_STORAGE_ERRORS: Counter =
    Counter::new("qapal.session.storage_errors");

pub(crate) static CHAT_QUESTIONS: Counter = Counter::new("qapal.chat.questions");
pub(crate) static CHAT_FAILURES: Counter = Counter::new("qapal.chat.failures");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_moments(&CLIENT_REQUEST_DURATION);

    collector.register_counter(&SESSION_LOGINS);
    collector.register_counter(&SESSION_LOGOUTS);
    collector.register_counter(&SESSION_STORAGE_ERRORS);

    collector.register_counter(&CHAT_QUESTIONS);
    collector.register_counter(&CHAT_FAILURES);
}
