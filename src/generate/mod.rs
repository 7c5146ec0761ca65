// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of mermaid-sync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Natural-language generation of diagram sources.
//!
//! The text-completion service is external ([`Generator`]). This module builds the request,
//! cleans the response and enforces that at most one request is in flight.

use std::future::Future;

use tracing::{debug, info, warn};

pub const SYSTEM_INSTRUCTION: &str = "\
You are an expert UML architect and software designer. Your task is to generate valid Mermaid.js \
syntax based on the user's natural language request.

Rules:
1. Output ONLY the Mermaid code. Do not include markdown code fences (like ```mermaid or ```).
2. Do not include any explanation or conversational text.
3. If the user asks for a specific type of diagram (Sequence, Class, etc.), use the appropriate Mermaid syntax.
4. If the user provides a vague request, infer the most suitable diagram type (usually Flowchart or Class diagram).
5. Ensure the syntax is valid and will render correctly. Use standard direction (TD or LR) for graphs unless specified.
6. Use clear, descriptive labels for nodes and relationships.
7. Write labels in the language of the user's request.
";

/// Low temperature keeps generated code consistent between calls.
pub const GENERATION_TEMPERATURE: f32 = 0.2;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GenerationError {
    #[error("a generation request is already in progress")]
    Busy,
    #[error("generation service failed: {message}")]
    Service { message: String },
    #[error("generation service returned no diagram")]
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub system_instruction: &'static str,
    pub prompt: String,
    pub temperature: f32,
}

impl GenerationRequest {
    pub fn new(instruction: &str, current: Option<&str>) -> Self {
        Self {
            system_instruction: SYSTEM_INSTRUCTION,
            prompt: build_prompt(instruction, current),
            temperature: GENERATION_TEMPERATURE,
        }
    }
}

/// Produces diagram source from a request. Responses may still carry code fences.
pub trait Generator {
    fn generate(
        &self,
        request: &GenerationRequest,
    ) -> impl Future<Output = Result<String, GenerationError>> + Send;
}

/// The instruction alone, or wrapped around the current source when there is one.
pub fn build_prompt(instruction: &str, current: Option<&str>) -> String {
    match current.filter(|code| !code.trim().is_empty()) {
        Some(code) => format!(
            "Original Code:\n{code}\n\nModification Request: {instruction}\n\nOutput the full updated Mermaid code only."
        ),
        None => instruction.to_owned(),
    }
}

/// Removes a leading ```` ```mermaid ```` / ```` ``` ```` fence and a trailing one, then trims.
pub fn strip_fences(text: &str) -> String {
    let text = text
        .strip_prefix("```mermaid\n")
        .or_else(|| text.strip_prefix("```\n"))
        .unwrap_or(text);
    let text = text.strip_suffix("\n```").unwrap_or(text);
    text.trim().to_owned()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationTicket(u64);

/// Busy flag for the single in-flight generation request.
#[derive(Debug, Default)]
pub struct GenerationGate {
    issued: u64,
    in_flight: Option<u64>,
}

impl GenerationGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Claims the gate, or fails with `Busy` while another request is outstanding.
    pub fn begin(&mut self) -> Result<GenerationTicket, GenerationError> {
        if self.in_flight.is_some() {
            warn!("generation rejected: request already in flight");
            return Err(GenerationError::Busy);
        }
        self.issued += 1;
        self.in_flight = Some(self.issued);
        info!(ticket = self.issued, "generation started");
        Ok(GenerationTicket(self.issued))
    }

    /// Abandons the in-flight request; its response will be discarded.
    pub fn cancel(&mut self) {
        if let Some(ticket) = self.in_flight.take() {
            debug!(ticket, "generation cancelled");
        }
    }

    /// Releases the gate and cleans the response.
    ///
    /// `Ok(None)` means the ticket was cancelled or superseded and the response must be dropped.
    pub fn finish(
        &mut self,
        ticket: GenerationTicket,
        response: Result<String, GenerationError>,
    ) -> Result<Option<String>, GenerationError> {
        if self.in_flight != Some(ticket.0) {
            debug!(ticket = ticket.0, "discarding stale generation response");
            return Ok(None);
        }
        self.in_flight = None;

        let text = response.inspect_err(|err| warn!(error = %err, "generation failed"))?;
        let code = strip_fences(&text);
        if code.is_empty() {
            warn!("generation returned an empty diagram");
            return Err(GenerationError::Empty);
        }
        info!(ticket = ticket.0, bytes = code.len(), "generation finished");
        Ok(Some(code))
    }
}
