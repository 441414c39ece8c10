// Stdio checks for the MCP transport

use tracing::{debug, warn};

/// Which standard streams are attached to a terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StdioStatus {
    pub stdin_terminal: bool,
    pub stdout_terminal: bool,
}

impl StdioStatus {
    #[must_use]
    pub fn detect() -> Self {
        Self {
            stdin_terminal: atty::is(atty::Stream::Stdin),
            stdout_terminal: atty::is(atty::Stream::Stdout),
        }
    }

    /// Problems with running the JSON-RPC transport on these streams
    #[must_use]
    pub fn warnings(&self) -> Vec<&'static str> {
        let mut warnings = Vec::new();
        if self.stdout_terminal {
            warnings.push(
                "stdout is a terminal: JSON-RPC responses will be printed to the console instead of an MCP host",
            );
        }
        if self.stdin_terminal {
            warnings.push(
                "stdin is a terminal: the server expects JSON-RPC requests from an MCP host, not interactive input",
            );
        }
        warnings
    }

    pub fn log(&self) {
        let warnings = self.warnings();
        if warnings.is_empty() {
            debug!("Stdio transport attached to pipes");
        }
        for warning in warnings {
            warn!("{}", warning);
        }
    }
}
