//! External collaborator seams: audit sink and principal provider.
//!
//! Both are consumed, never owned — the engine calls through these
//! narrow contracts and survives any failure behind them.

use tracing::info;

use crate::events::InstanceEvent;

/// Fire-and-forget audit recording.
///
/// Implementations must not panic; a failing sink must never affect
/// lifecycle operations, so `record` returns nothing and implementors
/// swallow (and log) their own errors.
pub trait AuditSink: Send + Sync {
    fn record(&self, event: &InstanceEvent);
}

/// Audit sink that writes structured log lines.
pub struct LogAuditSink;

impl AuditSink for LogAuditSink {
    fn record(&self, event: &InstanceEvent) {
        info!(
            event = "core.audit.recorded",
            kind = ?event.kind,
            instance_id = %event.instance.id,
            app_id = %event.instance.descriptor.id,
            principal = %event.instance.principal,
            reason = event.reason.as_deref().unwrap_or("")
        );
    }
}

/// Supplies the "launched by" / "current user" principal string.
pub trait PrincipalProvider: Send + Sync {
    fn current_principal(&self) -> String;
}

/// Principal provider backed by the process environment.
pub struct EnvPrincipalProvider;

impl PrincipalProvider for EnvPrincipalProvider {
    fn current_principal(&self) -> String {
        std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .unwrap_or_else(|_| "unknown".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ApplicationDescriptor, ApplicationKind};
    use crate::events::InstanceEventKind;
    use crate::instances::types::ApplicationInstance;

    #[test]
    fn test_log_audit_sink_does_not_panic() {
        let instance = ApplicationInstance::new(
            ApplicationDescriptor {
                id: "app-1".to_string(),
                kind: ApplicationKind::Folder,
                target: "/tmp".to_string(),
                args: vec![],
                display_name: "Tmp".to_string(),
                working_dir: None,
            },
            "alice".to_string(),
        );
        let event = InstanceEvent::new(InstanceEventKind::Started, instance, None, None);
        LogAuditSink.record(&event);
    }

    #[test]
    fn test_env_principal_provider_never_empty() {
        let principal = EnvPrincipalProvider.current_principal();
        assert!(!principal.is_empty());
    }
}
