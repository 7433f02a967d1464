//! Panel seats given on the command line
//!
//! A seat is written `[name=][provider:]model`. The provider prefix is only
//! taken when it names a known provider, so Ollama tags such as
//! `qwen2.5:3b` are read as a model.

use jury_domain::{JudgeSpec, ParticipantSpec, Provider};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SeatError {
    #[error("Empty participant spec")]
    Empty,

    #[error("Participant spec '{0}' has an empty name")]
    EmptyName(String),

    #[error("Participant spec '{0}' has no model")]
    MissingModel(String),
}

struct Seat {
    name: Option<String>,
    provider: Provider,
    model: String,
}

fn parse(spec: &str) -> Result<Seat, SeatError> {
    let spec = spec.trim();
    if spec.is_empty() {
        return Err(SeatError::Empty);
    }

    let (name, rest) = match spec.split_once('=') {
        Some((name, rest)) => {
            let name = name.trim();
            if name.is_empty() {
                return Err(SeatError::EmptyName(spec.to_string()));
            }
            (Some(name.to_string()), rest.trim())
        }
        None => (None, spec),
    };

    let (provider, model) = match rest.split_once(':') {
        Some((prefix, model)) => match prefix.parse::<Provider>() {
            Ok(provider) => (provider, model.trim()),
            Err(_) => (Provider::Ollama, rest),
        },
        None => (Provider::Ollama, rest),
    };

    if model.is_empty() {
        return Err(SeatError::MissingModel(spec.to_string()));
    }

    Ok(Seat {
        name,
        provider,
        model: model.to_string(),
    })
}

/// Parse a single participant seat; the name defaults to the model
pub fn parse_participant(spec: &str) -> Result<ParticipantSpec, SeatError> {
    let seat = parse(spec)?;
    let name = seat.name.unwrap_or_else(|| seat.model.clone());
    Ok(ParticipantSpec::new(name, seat.provider, seat.model))
}

/// Parse a list of seats.
///
/// Seats without an explicit name that share a model are numbered
/// (`qwen2.5:3b 1`, `qwen2.5:3b 2`) so that every speaker stays distinct.
pub fn parse_panel<S: AsRef<str>>(specs: &[S]) -> Result<Vec<ParticipantSpec>, SeatError> {
    let seats = specs
        .iter()
        .map(|s| parse(s.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;

    let mut implicit: HashMap<&str, usize> = HashMap::new();
    for seat in seats.iter().filter(|s| s.name.is_none()) {
        *implicit.entry(seat.model.as_str()).or_default() += 1;
    }

    let mut seen: HashMap<String, usize> = HashMap::new();
    let panel = seats
        .iter()
        .map(|seat| {
            let name = match &seat.name {
                Some(name) => name.clone(),
                None if implicit.get(seat.model.as_str()).copied().unwrap_or(0) > 1 => {
                    let n = seen.entry(seat.model.clone()).or_default();
                    *n += 1;
                    format!("{} {}", seat.model, n)
                }
                None => seat.model.clone(),
            };
            ParticipantSpec::new(name, seat.provider, seat.model.clone())
        })
        .collect();
    Ok(panel)
}

/// Parse the judge seat; the name defaults to `Judge <model>`
pub fn parse_judge(spec: &str, verdict_threshold: f32) -> Result<JudgeSpec, SeatError> {
    let seat = parse(spec)?;
    let name = seat.name.unwrap_or_else(|| format!("Judge {}", seat.model));
    Ok(JudgeSpec::new(ParticipantSpec::new(name, seat.provider, seat.model))
        .with_threshold(verdict_threshold))
}
