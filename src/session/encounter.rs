//! Monster rosters for random encounters.

use crate::character::Hero;
use crate::combat::{Monster, MonsterTemplate};
use crate::templates::TemplateCatalog;
use rand::Rng;
use tracing::debug;

/// One monster per standing hero; the full party size if nobody stands.
pub fn roster_size(party: &[Hero]) -> usize {
    let standing = party.iter().filter(|h| !h.fainted).count();
    if standing == 0 {
        party.len()
    } else {
        standing
    }
}

/// Templates eligible to face a party whose strongest hero is `hero_level`.
///
/// Level 1 parties only meet level 1 monsters. Otherwise anything within one
/// level qualifies. With no match, the single closest template wins, the
/// first one found in pool order breaking ties.
pub fn candidates(catalog: &TemplateCatalog, hero_level: u32) -> Vec<&MonsterTemplate> {
    let matching: Vec<&MonsterTemplate> = if hero_level <= 1 {
        catalog.monster_pools().filter(|m| m.level == 1).collect()
    } else {
        catalog
            .monster_pools()
            .filter(|m| m.level.abs_diff(hero_level) <= 1)
            .collect()
    };
    if !matching.is_empty() {
        return matching;
    }

    let mut closest: Option<&MonsterTemplate> = None;
    for template in catalog.monster_pools() {
        let better = closest.map_or(true, |best| {
            template.level.abs_diff(hero_level) < best.level.abs_diff(hero_level)
        });
        if better {
            closest = Some(template);
        }
    }
    closest.into_iter().collect()
}

/// Fresh monsters for one battle, each slot an independent uniform pick.
pub fn build_roster(party: &[Hero], catalog: &TemplateCatalog, rng: &mut impl Rng) -> Vec<Monster> {
    let hero_level = party.iter().map(|h| h.level).max().unwrap_or(1);
    let pool = candidates(catalog, hero_level);
    if pool.is_empty() {
        return Vec::new();
    }

    let size = roster_size(party);
    let roster: Vec<Monster> = (0..size)
        .map(|_| Monster::from_template(pool[rng.gen_range(0..pool.len())]))
        .collect();
    debug!(hero_level, size, candidates = pool.len(), "roster built");
    roster
}
