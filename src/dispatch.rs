// src/dispatch.rs

//! Protocol line parsing and command dispatch.
//!
//! One dispatch per connection; no state is carried across connections.
//! Every malformed input or failed lookup comes back as a typed error so
//! the connection handler can turn it into an `[ERR]` line instead of
//! tearing anything down.

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::ConfigStore;
use crate::errors::{Result, WormholeError};
use crate::exec::Launcher;
use crate::resolve;

/// Outcome of a successfully dispatched command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Plain response text for the client.
    Message(String),
    /// Response text after which the whole server shuts down.
    Exit(String),
}

impl Reply {
    pub fn text(&self) -> &str {
        match self {
            Reply::Message(text) | Reply::Exit(text) => text,
        }
    }
}

pub struct Dispatcher<L> {
    store: Arc<ConfigStore>,
    launcher: L,
}

impl<L: Launcher> Dispatcher<L> {
    pub fn new(store: Arc<ConfigStore>, launcher: L) -> Self {
        Self { store, launcher }
    }

    /// Handle one protocol line.
    ///
    /// The line is trimmed and split on whitespace; the first word is the
    /// verb (matched case-insensitively), the rest are its arguments.
    pub fn dispatch(&self, line: &str) -> Result<Reply> {
        let words: Vec<&str> = line.split_whitespace().collect();

        let Some((verb, rest)) = words.split_first() else {
            warn!("empty request line");
            return Err(WormholeError::TooFewWords(1));
        };

        match verb.to_ascii_lowercase().as_str() {
            "invoke" => {
                let Some((mapping, caller_args)) = rest.split_first() else {
                    warn!("invoke without a mapping name");
                    return Err(WormholeError::TooFewWords(2));
                };
                self.invoke(mapping, caller_args)
            }
            "version" => Ok(Reply::Message(crate::version().to_string())),
            "reload" => {
                self.store.reload()?;
                Ok(Reply::Message("Re-read configuration.".to_string()))
            }
            "exit" => {
                warn!("client requested exit, shutting down");
                Ok(Reply::Exit("Bye!".to_string()))
            }
            _ => Err(WormholeError::UnknownCommand(
                self.store.current().available_apps(),
            )),
        }
    }

    fn invoke(&self, mapping: &str, caller_args: &[&str]) -> Result<Reply> {
        let caller_args: Vec<String> =
            caller_args.iter().map(|arg| arg.to_string()).collect();

        let config = self.store.current();
        let invocation = resolve::resolve(&config, mapping, &caller_args)?;

        info!(
            executable = %invocation.executable,
            mapping,
            args = ?invocation.args,
            "invoking"
        );
        self.launcher.launch(invocation)?;

        Ok(Reply::Message(format!("Started {mapping}")))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use tempfile::NamedTempFile;

    use super::*;
    use crate::resolve::Invocation;

    /// Records invocations instead of spawning OS processes.
    #[derive(Default)]
    struct RecordingLauncher {
        launched: Mutex<Vec<Invocation>>,
    }

    impl Launcher for RecordingLauncher {
        fn launch(&self, invocation: Invocation) -> Result<()> {
            self.launched.lock().unwrap().push(invocation);
            Ok(())
        }
    }

    const CONFIG: &str = r#"
        [[mapping]]
        from = "/home/"
        to = "A:"

        [apps]
        sublime = "/opt/sublime/sublime"
    "#;

    fn test_dispatcher() -> (Dispatcher<RecordingLauncher>, NamedTempFile) {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(CONFIG.as_bytes()).unwrap();

        let store = Arc::new(ConfigStore::load(file.path()).unwrap());
        (Dispatcher::new(store, RecordingLauncher::default()), file)
    }

    fn launched(dispatcher: &Dispatcher<RecordingLauncher>) -> Vec<Invocation> {
        dispatcher.launcher.launched.lock().unwrap().clone()
    }

    #[test]
    fn invoke_starts_the_mapped_app_with_translated_args() {
        let (dispatcher, _cfg) = test_dispatcher();

        let reply = dispatcher.dispatch("INVOKE sublime /home/a.txt\n").unwrap();

        assert_eq!(reply, Reply::Message("Started sublime".to_string()));
        let launches = launched(&dispatcher);
        assert_eq!(launches.len(), 1);
        assert_eq!(launches[0].executable, "/opt/sublime/sublime");
        assert_eq!(launches[0].args, vec!["A:a.txt"]);
    }

    #[test]
    fn verbs_match_case_insensitively() {
        let (dispatcher, _cfg) = test_dispatcher();
        let reply = dispatcher.dispatch("invoke sublime\n").unwrap();
        assert_eq!(reply, Reply::Message("Started sublime".to_string()));
    }

    #[test]
    fn empty_line_is_a_protocol_error() {
        let (dispatcher, _cfg) = test_dispatcher();
        let err = dispatcher.dispatch("").unwrap_err();
        assert!(matches!(err, WormholeError::TooFewWords(1)));
        assert!(launched(&dispatcher).is_empty());
    }

    #[test]
    fn invoke_without_mapping_is_a_protocol_error() {
        let (dispatcher, _cfg) = test_dispatcher();
        let err = dispatcher.dispatch("INVOKE\n").unwrap_err();
        assert!(matches!(err, WormholeError::TooFewWords(2)));
        assert!(launched(&dispatcher).is_empty());
    }

    #[test]
    fn unknown_verb_lists_available_apps() {
        let (dispatcher, _cfg) = test_dispatcher();
        let err = dispatcher.dispatch("FOO\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unknown command, expected one of sublime"
        );
        assert!(launched(&dispatcher).is_empty());
    }

    #[test]
    fn invoke_of_unknown_mapping_launches_nothing() {
        let (dispatcher, _cfg) = test_dispatcher();
        let err = dispatcher.dispatch("INVOKE emacs\n").unwrap_err();
        assert!(matches!(err, WormholeError::NotFound(_)));
        assert!(launched(&dispatcher).is_empty());
    }

    #[test]
    fn version_reports_the_build_version() {
        let (dispatcher, _cfg) = test_dispatcher();
        let reply = dispatcher.dispatch("VERSION\n").unwrap();
        assert_eq!(reply, Reply::Message(crate::version().to_string()));
    }

    #[test]
    fn exit_requests_shutdown_after_the_reply() {
        let (dispatcher, _cfg) = test_dispatcher();
        let reply = dispatcher.dispatch("EXIT\n").unwrap();
        assert_eq!(reply, Reply::Exit("Bye!".to_string()));
    }

    #[test]
    fn reload_picks_up_new_apps_and_keeps_old_config_on_failure() {
        let (dispatcher, mut cfg) = test_dispatcher();

        // Grow the config, reload, and the new app resolves.
        cfg.as_file_mut()
            .write_all(b"\nemacs = \"/usr/bin/emacs\"\n")
            .unwrap();
        let reply = dispatcher.dispatch("RELOAD\n").unwrap();
        assert_eq!(reply, Reply::Message("Re-read configuration.".to_string()));
        dispatcher.dispatch("INVOKE emacs\n").unwrap();

        // Break the file: reload fails, previous snapshot stays active.
        cfg.as_file_mut().write_all(b"\n[[broken\n").unwrap();
        assert!(dispatcher.dispatch("RELOAD\n").is_err());
        dispatcher.dispatch("INVOKE emacs\n").unwrap();
    }
}
