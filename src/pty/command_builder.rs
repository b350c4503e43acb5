// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Builder for the command a [`super::PtyProcessBackend`] spawns.
//!
//! Wraps [`portable_pty::CommandBuilder`] with the defaults a terminal
//! emulator must not forget: an explicit working directory (portable-pty
//! otherwise starts the child in `$HOME`) and a sane `TERM`.

use std::path::PathBuf;

use portable_pty::CommandBuilder;

/// A validated command ready to hand to the pty system.
pub type PtyCommand = CommandBuilder;

#[derive(Debug, Clone)]
pub struct PtyCommandBuilder {
    command: String,
    args: Vec<String>,
    cwd: Option<PathBuf>,
    env_vars: Vec<(String, String)>,
}

impl PtyCommandBuilder {
    pub fn new(command: impl Into<String>) -> Self {
        PtyCommandBuilder {
            command: command.into(),
            args: Vec::new(),
            cwd: None,
            env_vars: Vec::new(),
        }
    }

    #[must_use]
    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Working directory for the child. Defaults to the current directory at
    /// [`build`](Self::build) time.
    #[must_use]
    pub fn cwd(mut self, path: impl Into<PathBuf>) -> Self {
        self.cwd = Some(path.into());
        self
    }

    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.push((key.into(), value.into()));
        self
    }

    /// Finalize into a [`PtyCommand`].
    ///
    /// # Errors
    ///
    /// Fails when no working directory was given and the current directory
    /// cannot be determined.
    pub fn build(self) -> miette::Result<PtyCommand> {
        let cwd = match self.cwd {
            Some(cwd) => cwd,
            None => std::env::current_dir()
                .map_err(|e| miette::miette!("failed to get current directory: {e}"))?,
        };

        let mut cmd = CommandBuilder::new(&self.command);
        for arg in &self.args {
            cmd.arg(arg);
        }
        cmd.cwd(cwd);

        // Children probe TERM to decide which sequences to emit; advertise
        // the repertoire this crate actually parses.
        if !self.env_vars.iter().any(|(key, _)| key == "TERM") {
            cmd.env("TERM", "xterm-256color");
        }
        for (key, value) in &self.env_vars {
            cmd.env(key, value);
        }

        Ok(cmd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_fills_in_cwd_and_term() {
        let cmd = PtyCommandBuilder::new("echo").args(["hi"]).build().unwrap();
        let debug = format!("{cmd:?}");
        assert!(debug.contains("echo"));
    }

    #[test]
    fn explicit_term_wins() {
        let cmd = PtyCommandBuilder::new("sh")
            .env("TERM", "dumb")
            .build()
            .unwrap();
        let debug = format!("{cmd:?}");
        assert!(debug.contains("dumb"));
    }
}
