use std::any::Any;
use std::panic::Location;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init_logging() {
    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    let filter_layer = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,quill_server=debug"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();

    tracing::info!("Logging initialized");
}

/// An uncaught panic takes the whole process down after one log line. There
/// is no recovery path: a worker that panicked must not keep serving.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        tracing::error!(
            "Unhandled panic: {}",
            describe_panic(info.payload(), info.location())
        );
        std::process::exit(1);
    }));
}

fn describe_panic(payload: &dyn Any, location: Option<&Location>) -> String {
    let message = if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "<non-string panic payload>"
    };

    match location {
        Some(loc) => format!("{} at {}:{}", message, loc.file(), loc.line()),
        None => message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describes_str_and_string_payloads() {
        let payload: Box<dyn Any> = Box::new("boom");
        assert!(describe_panic(payload.as_ref(), None).contains("boom"));

        let payload: Box<dyn Any> = Box::new("worker died".to_string());
        assert_eq!(describe_panic(payload.as_ref(), None), "worker died");
    }

    #[test]
    fn includes_location_when_present() {
        let payload: Box<dyn Any> = Box::new("boom");
        let described = describe_panic(payload.as_ref(), Some(Location::caller()));
        assert!(described.starts_with("boom at "));
        assert!(described.contains("logging.rs"));
    }

    #[test]
    fn opaque_payloads_get_a_placeholder() {
        let payload: Box<dyn Any> = Box::new(42u32);
        assert_eq!(
            describe_panic(payload.as_ref(), None),
            "<non-string panic payload>"
        );
    }
}
