//! Seat allocation for overbooked flights.
//!
//! Passengers are grouped by reservation, each group takes the tier of its
//! best member, and groups board in descending tier order (first appearance
//! breaks ties). Only the group straddling the capacity boundary is split.

use crate::core::tier::rank;
use crate::domain::model::{Allocation, Passenger, ReservationGroup};
use crate::utils::error::{ManifestError, Result};
use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

pub fn allocate(passengers: &[Passenger], capacity: i64) -> Result<Allocation> {
    if capacity < 0 {
        return Err(ManifestError::InvalidCapacity { capacity });
    }
    ensure_unique_ids(passengers)?;

    let capacity = usize::try_from(capacity).unwrap_or(usize::MAX);

    if passengers.len() <= capacity {
        tracing::debug!(
            "All {} passengers fit in capacity {}, skipping grouping",
            passengers.len(),
            capacity
        );
        return Ok(Allocation {
            boarded_passengers: passengers.iter().map(|p| with_boarded(p, true)).collect(),
            passengers_on_waiting_list: Vec::new(),
        });
    }

    let mut groups = group_by_reservation(passengers);
    groups.sort_by_key(|group| (Reverse(group.priority), group.first_seen));

    let mut remaining = capacity;
    let mut boarded_passengers = Vec::with_capacity(capacity);
    let mut boarded_ids = HashSet::with_capacity(capacity);

    for group in &groups {
        if remaining == 0 {
            break;
        }
        if group.members.len() > remaining {
            tracing::debug!(
                "Splitting reservation {}: {} of {} members board",
                group.reservation_id,
                remaining,
                group.members.len()
            );
        }
        for member in group.members.iter().take(remaining) {
            boarded_ids.insert(member.id);
            boarded_passengers.push(with_boarded(member, true));
        }
        remaining = remaining.saturating_sub(group.members.len());
    }

    let passengers_on_waiting_list: Vec<Passenger> = passengers
        .iter()
        .filter(|p| !boarded_ids.contains(&p.id))
        .map(|p| with_boarded(p, false))
        .collect();

    tracing::debug!(
        "Allocated {} groups: {} boarded, {} waitlisted",
        groups.len(),
        boarded_passengers.len(),
        passengers_on_waiting_list.len()
    );

    Ok(Allocation {
        boarded_passengers,
        passengers_on_waiting_list,
    })
}

/// Groups in first-appearance order, members in input order.
pub fn group_by_reservation(passengers: &[Passenger]) -> Vec<ReservationGroup<'_>> {
    let mut groups: Vec<ReservationGroup<'_>> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for (position, passenger) in passengers.iter().enumerate() {
        let priority = rank(passenger.category);
        match index.get(passenger.reservation_id.as_str()) {
            Some(&slot) => {
                let group = &mut groups[slot];
                group.members.push(passenger);
                group.priority = group.priority.max(priority);
            }
            None => {
                index.insert(passenger.reservation_id.as_str(), groups.len());
                groups.push(ReservationGroup {
                    reservation_id: passenger.reservation_id.as_str(),
                    members: vec![passenger],
                    priority,
                    first_seen: position,
                });
            }
        }
    }

    groups
}

fn ensure_unique_ids(passengers: &[Passenger]) -> Result<()> {
    let mut seen = HashSet::with_capacity(passengers.len());
    for passenger in passengers {
        if !seen.insert(passenger.id) {
            return Err(ManifestError::DuplicatePassengerId { id: passenger.id });
        }
    }
    Ok(())
}

fn with_boarded(passenger: &Passenger, boarded: bool) -> Passenger {
    Passenger {
        boarded,
        ..passenger.clone()
    }
}
