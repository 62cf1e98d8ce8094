//! Line-oriented front ends: interactive REPL and one-shot ask.
//!
//! Both run the same turn controller against an in-memory transcript and
//! print what the turn produced.

use std::io::{self, Write};

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use crate::chat::{Entry, Role, Transcript, TurnController};

/// Whether a line asks to leave the REPL.
pub fn is_exit(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case("exit")
}

/// Write bot replies and sources annotations. User lines are skipped
/// since the terminal already shows what was typed.
pub fn write_replies<W: Write>(out: &mut W, entries: &[Entry]) -> io::Result<()> {
    for entry in entries {
        match entry {
            Entry::Message(msg) if msg.role == Role::User => {}
            Entry::Message(msg) => writeln!(out, "Answer: {}", msg.text)?,
            Entry::Sources { text, .. } => writeln!(out, "{text}")?,
        }
    }
    Ok(())
}

/// Run one turn and return the entries it produced.
pub async fn ask(controller: &TurnController, question: &str) -> Transcript {
    let mut transcript = Transcript::new();
    controller.submit_turn(&mut transcript, question).await;
    transcript
}

/// Interactive loop over stdin until EOF or `exit`.
pub async fn run_repl(controller: &TurnController) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut transcript = Transcript::new();

    println!("Policy Q&A client ready. Ask a question (or type 'exit' to quit).");
    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if is_exit(&line) {
            println!("Exiting...");
            break;
        }

        let start = transcript.len();
        controller.submit_turn(&mut transcript, &line).await;
        write_replies(&mut io::stdout().lock(), &transcript.entries()[start..])?;
    }

    info!(entries = transcript.len(), "repl finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;

    use crate::api::{ApiError, HealthStatus, QueryBackend, QueryResult};

    struct NotReady;

    #[async_trait]
    impl QueryBackend for NotReady {
        async fn health(&self) -> Result<HealthStatus, ApiError> {
            Ok(HealthStatus { ready: false })
        }

        async fn query(&self, _query: &str) -> Result<QueryResult, ApiError> {
            unreachable!("query must not be sent when not ready")
        }
    }

    struct Answers;

    #[async_trait]
    impl QueryBackend for Answers {
        async fn health(&self) -> Result<HealthStatus, ApiError> {
            Ok(HealthStatus { ready: true })
        }

        async fn query(&self, _query: &str) -> Result<QueryResult, ApiError> {
            Ok(QueryResult::new("Twenty days per year.", &["leave.pdf", "faq.md"]))
        }
    }

    #[test]
    fn exit_is_case_insensitive() {
        assert!(is_exit("exit"));
        assert!(is_exit("  EXIT \n"));
        assert!(!is_exit("exit now"));
        assert!(!is_exit(""));
    }

    #[tokio::test]
    async fn ask_prints_answer_and_sources() {
        let controller = TurnController::new(Arc::new(Answers));
        let transcript = ask(&controller, "How much leave do I get?").await;

        let mut out = Vec::new();
        write_replies(&mut out, transcript.entries()).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Answer: Twenty days per year.\nSources: leave.pdf, faq.md\n"
        );
    }

    #[tokio::test]
    async fn ask_not_ready_prints_notice() {
        let controller = TurnController::new(Arc::new(NotReady));
        let transcript = ask(&controller, "anything").await;

        let mut out = Vec::new();
        write_replies(&mut out, transcript.entries()).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Answer: Server is not ready. Please try again later.\n"
        );
    }

    #[tokio::test]
    async fn ask_blank_prints_nothing() {
        let controller = TurnController::new(Arc::new(NotReady));
        let transcript = ask(&controller, "  ").await;
        assert!(transcript.is_empty());
    }
}
