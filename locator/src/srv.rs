//! SRV resolution step and RFC 2782 target ordering.

use itertools::Itertools;
use rand::Rng;

use crate::dns::{self, Resolve, ServiceRecord};
use crate::transport::Transport;

/// Source of the random draws used by the weighted SRV selection.
pub trait RandomSource: Send + Sync {
    /// Returns a number drawn uniformly from `0..upper`. `upper` is never 0.
    fn below(&self, upper: u32) -> u32;
}

/// [`RandomSource`] backed by the thread-local generator of `rand`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngSource;

impl RandomSource for ThreadRngSource {
    fn below(&self, upper: u32) -> u32 {
        if upper == 0 {
            return 0;
        }
        rand::rng().random_range(0..upper)
    }
}

/// Looks up the service records of `transport` in `domain` and returns them
/// in the order they should be tried.
pub async fn lookup_services(
    resolver: &dyn Resolve,
    random: &dyn RandomSource,
    transport: Transport,
    domain: &str,
) -> Vec<ServiceRecord> {
    lookup_services_at(resolver, random, &transport.service_identifier(domain)).await
}

/// Looks up the service records at the service identifier `service` and
/// returns them in the order they should be tried.
pub async fn lookup_services_at(resolver: &dyn Resolve, random: &dyn RandomSource, service: &str) -> Vec<ServiceRecord> {
    let records = dns::records_or_empty(resolver.lookup_service_records(service).await);
    log::debug!("Got {} SRV records for \"{}\"", records.len(), service);

    order_service_records(records, random)
}

/// Orders service records per RFC 2782.
///
/// Priorities are consumed lowest first. Inside a priority every record is
/// drawn with a probability proportional to its weight until none is left,
/// so zero weight records come after every weighted one of their priority.
pub fn order_service_records(mut records: Vec<ServiceRecord>, random: &dyn RandomSource) -> Vec<ServiceRecord> {
    records.sort_by_key(|r| r.priority);

    let mut ordered = Vec::with_capacity(records.len());
    for (_priority, group) in &records.into_iter().chunk_by(|r| r.priority) {
        let mut group: Vec<ServiceRecord> = group.collect();
        while !group.is_empty() {
            let picked = pick_weighted(&group, random);
            ordered.push(group.remove(picked));
        }
    }

    ordered
}

fn pick_weighted(group: &[ServiceRecord], random: &dyn RandomSource) -> usize {
    let last = group.len() - 1;
    let total: u32 = group.iter().map(|r| u32::from(r.weight)).sum();

    if total == 0 {
        return (random.below(group.len() as u32) as usize).min(last);
    }

    let point = random.below(total);
    let mut running = 0;
    group
        .iter()
        .position(|r| {
            running += u32::from(r.weight);
            running > point
        })
        .unwrap_or(last)
}
