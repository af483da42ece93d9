//! The suggestion loop: one new trial per requested assignment set.

use std::collections::HashMap;
use std::sync::Arc;

use crate::cancel::CancelToken;
use crate::codec;
use crate::error::{Error, Result};
use crate::param::ParamValue;
use crate::study::Study;

/// One complete assignment: a value for every parameter, in search-space order.
pub type Assignment = Vec<(String, ParamValue)>;

/// Produce `count` assignment sets from `study`.
///
/// Rounds run sequentially. Each round registers a new running trial, asks
/// the relative sampler (if any) for a joint proposal, then fills every
/// parameter the proposal does not cover with the independent sampler.
/// Sampled values are recorded on the new trial. No observations are
/// exchanged between rounds.
///
/// `cancel` is checked once before each round.
///
/// # Errors
///
/// Returns `Error::Cancelled` if `cancel` fires and
/// `Error::SamplerInvocation` if a sampler or decode step fails. Partial
/// batches are never returned.
pub fn suggest(study: &mut Study, count: usize, cancel: &CancelToken) -> Result<Vec<Assignment>> {
    let space = Arc::clone(&study.search_space);
    let independent = Arc::clone(&study.sampler);
    let relative = study.relative_sampler.clone();

    let mut batch = Vec::with_capacity(count);
    for _ in 0..count {
        cancel.check()?;

        let trial_id = study.create_new_trial();
        let wrap = |e: Error| Error::SamplerInvocation {
            trial_id,
            source: Box::new(e),
        };

        let proposal = match &relative {
            Some(sampler) => {
                let trial = study
                    .trial(trial_id)
                    .ok_or(Error::Internal("new trial missing from storage"))?;
                sampler.sample_relative(study, trial, &space).map_err(wrap)?
            }
            None => HashMap::new(),
        };

        let mut assignment = Vec::with_capacity(space.len());
        for (name, distribution) in space.iter() {
            let internal = match proposal.get(name) {
                Some(&value) => value,
                None => {
                    let trial = study
                        .trial(trial_id)
                        .ok_or(Error::Internal("new trial missing from storage"))?;
                    independent
                        .sample(study, trial, name, distribution)
                        .map_err(wrap)?
                }
            };
            let external = codec::decode(distribution, internal).map_err(wrap)?;
            study
                .set_trial_param(trial_id, name, internal, external.clone())
                .map_err(wrap)?;
            assignment.push((name.to_owned(), external));
        }

        trace_debug!(trial_id, n_params = assignment.len(), "suggested trial");
        batch.push(assignment);
    }
    Ok(batch)
}
