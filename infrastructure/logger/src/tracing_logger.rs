use business::domain::logger::Logger;
use tracing::{debug, error, info, warn};

/// `Logger` port backed by `tracing`. Every event carries the emitting
/// component as a structured field.
#[derive(Debug, Clone, Copy)]
pub struct TracingLogger {
    component: &'static str,
}

impl TracingLogger {
    pub const fn new(component: &'static str) -> Self {
        Self { component }
    }

    pub fn component(&self) -> &'static str {
        self.component
    }
}

impl Default for TracingLogger {
    fn default() -> Self {
        Self::new("cart")
    }
}

impl Logger for TracingLogger {
    fn info(&self, message: &str) {
        info!(target: "Cart -- ", component = self.component, "{}", message);
    }
    fn warn(&self, message: &str) {
        warn!(target: "Cart -- ", component = self.component, "{}", message);
    }
    fn error(&self, message: &str) {
        error!(target: "Cart -- ", component = self.component, "{}", message);
    }
    fn debug(&self, message: &str) {
        debug!(target: "Cart -- ", component = self.component, "{}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_to_cart_component() {
        assert_eq!(TracingLogger::default().component(), "cart");
        assert_eq!(TracingLogger::new("scheduler").component(), "scheduler");
    }

    #[test]
    fn should_log_without_a_subscriber() {
        let logger = TracingLogger::new("test");
        logger.info("info");
        logger.warn("warn");
        logger.error("error");
        logger.debug("debug");
    }
}
