// ABOUTME: Callback seam for delivery notifications and mobile originated messages
// ABOUTME: Closures implement Handler directly; DefaultHandler prints what it receives

/// Receives inbound traffic from the SMSC.
///
/// Handlers run on the task that processed the frame, so a slow handler
/// stalls that pipeline until it returns.
pub trait Handler: Send + Sync + 'static {
    fn handle(&self, sender: &str, receiver: &str, message_id: &str, message: &str, access_code: &str);
}

impl<F> Handler for F
where
    F: Fn(&str, &str, &str, &str, &str) + Send + Sync + 'static,
{
    fn handle(&self, sender: &str, receiver: &str, message_id: &str, message: &str, access_code: &str) {
        self(sender, receiver, message_id, message, access_code)
    }
}

/// Handler used when none is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultHandler;

impl Handler for DefaultHandler {
    fn handle(&self, sender: &str, receiver: &str, message_id: &str, message: &str, access_code: &str) {
        println!(
            "\nsender: {sender} receiver: {receiver} message_id: {message_id} message: {message} access_code: {access_code}"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_closure_handler() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let handler: Arc<dyn Handler> = Arc::new(
            move |sender: &str, _: &str, message_id: &str, message: &str, _: &str| {
                sink.lock()
                    .unwrap()
                    .push(format!("{sender}|{message_id}|{message}"));
            },
        );

        handler.handle("2371", "09191234567", "09191234567:1", "hi", "");
        assert_eq!(*seen.lock().unwrap(), vec!["2371|09191234567:1|hi"]);
    }
}
