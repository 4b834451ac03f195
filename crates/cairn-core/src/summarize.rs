//! Summarizer collaborators
//!
//! The engine only needs `(content, target level) -> replacement text`.
//! Quality is the summarizer's business; a failure leaves the node as it was.

use std::io::{Read, Write};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::config::SummarizerConfig;
use crate::deadline::Deadline;
use crate::error::{CairnError, Result};
use crate::text::{keywords, sentences, single_line, truncate_chars};
use crate::tree::CompressionLevel;

/// Environment variable carrying the target level to external summarizers
pub const TARGET_LEVEL_ENV: &str = "CAIRN_TARGET_LEVEL";

pub trait Summarizer {
    fn summarize(&self, content: &str, target: CompressionLevel) -> Result<String>;

    /// Like [`Summarizer::summarize`], giving up once `deadline` passes.
    /// Summarizers that return promptly can rely on the default.
    fn summarize_within(
        &self,
        content: &str,
        target: CompressionLevel,
        _deadline: &Deadline,
    ) -> Result<String> {
        self.summarize(content, target)
    }
}

/// Configured external command, or the built-in extractive summarizer when none is set
pub fn from_config(config: &SummarizerConfig) -> Result<Box<dyn Summarizer>> {
    if config.command.is_empty() {
        return Ok(Box::new(ExtractiveSummarizer));
    }
    let command = CommandSummarizer::from_argv(&config.command, config.timeout())?;
    Ok(Box::new(command))
}

/// Deterministic, offline summarizer built from leading sentences and keywords
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractiveSummarizer;

impl ExtractiveSummarizer {
    pub const SUMMARY_CHARS: usize = 400;
    pub const ONELINER_CHARS: usize = 120;
    pub const TAG_KEYWORDS: usize = 4;

    fn leading_sentences(content: &str, budget: usize) -> String {
        let mut out = String::new();
        for sentence in sentences(content) {
            let sentence = single_line(sentence);
            let needed = if out.is_empty() {
                sentence.len()
            } else {
                sentence.len() + 1
            };
            if !out.is_empty() && out.len() + needed > budget {
                break;
            }
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(&sentence);
        }
        truncate_chars(&out, budget)
    }
}

impl Summarizer for ExtractiveSummarizer {
    fn summarize(&self, content: &str, target: CompressionLevel) -> Result<String> {
        let result = match target {
            CompressionLevel::Full => single_line(content),
            CompressionLevel::Summary => Self::leading_sentences(content, Self::SUMMARY_CHARS),
            CompressionLevel::Oneliner => {
                let first = sentences(content).first().map(|s| single_line(s));
                truncate_chars(&first.unwrap_or_default(), Self::ONELINER_CHARS)
            }
            CompressionLevel::Tag => keywords(content, Self::TAG_KEYWORDS).join(", "),
        };

        if result.trim().is_empty() {
            // keep something rather than erase the node
            return Ok(truncate_chars(&single_line(content), Self::ONELINER_CHARS));
        }
        Ok(result)
    }
}

/// Runs an external program: content on stdin, replacement text on stdout
#[derive(Debug, Clone)]
pub struct CommandSummarizer {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandSummarizer {
    /// Build from `[program, args...]`
    pub fn from_argv(argv: &[String], timeout: Duration) -> Result<Self> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| CairnError::invalid_value("summarizer.command", "<empty>"))?;
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
            timeout,
        })
    }

    fn fail(&self, reason: impl std::fmt::Display) -> CairnError {
        CairnError::summarization(&self.program, reason)
    }
}

impl Summarizer for CommandSummarizer {
    fn summarize(&self, content: &str, target: CompressionLevel) -> Result<String> {
        self.run(content, target, &Deadline::none())
    }

    fn summarize_within(
        &self,
        content: &str,
        target: CompressionLevel,
        deadline: &Deadline,
    ) -> Result<String> {
        self.run(content, target, deadline)
    }
}

impl CommandSummarizer {
    #[tracing::instrument(skip(self, content, deadline), fields(program = %self.program, bytes = content.len()))]
    fn run(&self, content: &str, target: CompressionLevel, deadline: &Deadline) -> Result<String> {
        let timeout = deadline.cap(self.timeout);
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .env(TARGET_LEVEL_ENV, target.as_str())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.fail(format!("spawn: {}", e)))?;

        // Feed stdin and drain stdout on helper threads so a chatty child can't deadlock us
        let stdin = child.stdin.take();
        let input = content.to_string();
        let writer = thread::spawn(move || {
            if let Some(mut stdin) = stdin {
                let _ = stdin.write_all(input.as_bytes());
            }
        });
        let stdout = child.stdout.take();
        let reader = thread::spawn(move || {
            let mut out = String::new();
            if let Some(mut stdout) = stdout {
                let _ = stdout.read_to_string(&mut out);
            }
            out
        });

        let start = Instant::now();
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) if deadline.is_cancelled() => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(self.fail("cancelled by shutdown"));
                }
                Ok(None) if start.elapsed() >= timeout => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(self.fail(format!("timed out after {:?}", timeout)));
                }
                Ok(None) => thread::sleep(Duration::from_millis(20)),
                Err(e) => return Err(self.fail(format!("wait: {}", e))),
            }
        };

        let _ = writer.join();
        let output = reader
            .join()
            .map_err(|_| self.fail("stdout reader panicked"))?;

        if !status.success() {
            let mut stderr = String::new();
            if let Some(mut err) = child.stderr.take() {
                let _ = err.read_to_string(&mut stderr);
            }
            return Err(self.fail(format!(
                "exited with {}: {}",
                status,
                truncate_chars(stderr.trim(), 200)
            )));
        }

        let output = output.trim().to_string();
        if output.is_empty() {
            return Err(self.fail("empty output"));
        }
        crate::trace_time!(start, "command_summarize");
        Ok(output)
    }
}
