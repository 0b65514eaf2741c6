//! `RegimenCatalog` — the immutable set of all regimens.

use rustc_hash::FxHashMap;

use lot_core::{Line, RegimenId};

use crate::{Regimen, RegimenError, RegimenResult};

/// All known regimens, indexed by [`RegimenId`] and by name.
///
/// Built once before the run; never mutated.
#[derive(Clone, Debug, Default)]
pub struct RegimenCatalog {
    regimens: Vec<Regimen>,
    by_name:  FxHashMap<String, RegimenId>,
}

impl RegimenCatalog {
    /// Index `regimens` in the given order.
    ///
    /// Names must be unique.  Every regimen needs a finite approval year, a
    /// `peak_share` in [0, 1] and a finite `speed` and `time_to_peak`, so
    /// adoption shares always lie in [0, 1] and sum to one.
    pub fn new(regimens: Vec<Regimen>) -> RegimenResult<Self> {
        let mut by_name =
            FxHashMap::with_capacity_and_hasher(regimens.len(), Default::default());
        for (i, r) in regimens.iter().enumerate() {
            let id = RegimenId::try_from(i).map_err(|_| RegimenError::TooMany(regimens.len()))?;
            check_adoption_inputs(r)?;
            if by_name.insert(r.name.clone(), id).is_some() {
                return Err(RegimenError::DuplicateName(r.name.clone()));
            }
        }
        Ok(Self { regimens, by_name })
    }

    #[inline]
    pub fn get(&self, id: RegimenId) -> Option<&Regimen> {
        self.regimens.get(id.index())
    }

    /// Look up a regimen's id by name.
    #[inline]
    pub fn id_of(&self, name: &str) -> Option<RegimenId> {
        self.by_name.get(name).copied()
    }

    /// `(id, regimen)` pairs in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (RegimenId, &Regimen)> {
        self.regimens
            .iter()
            .enumerate()
            // `new` bounds the length to the id range.
            .map(|(i, r)| (RegimenId(i as u16), r))
    }

    /// Regimens declared for `line`, in catalog order.
    pub fn for_line(&self, line: Line) -> impl Iterator<Item = &Regimen> {
        self.regimens.iter().filter(move |r| r.line == line)
    }

    pub fn len(&self) -> usize {
        self.regimens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regimens.is_empty()
    }
}

fn check_adoption_inputs(r: &Regimen) -> RegimenResult<()> {
    let invalid = |reason: String| RegimenError::InvalidParameter {
        regimen: r.name.clone(),
        reason,
    };
    if !r.approval_year.is_finite() {
        return Err(invalid(format!("approval_year must be finite, got {}", r.approval_year)));
    }
    let a = &r.adoption;
    if !(a.peak_share.is_finite() && (0.0..=1.0).contains(&a.peak_share)) {
        return Err(invalid(format!("peak_share must be in [0, 1], got {}", a.peak_share)));
    }
    if !a.speed.is_finite() {
        return Err(invalid(format!("speed must be finite, got {}", a.speed)));
    }
    if !a.time_to_peak.is_finite() {
        return Err(invalid(format!("time_to_peak must be finite, got {}", a.time_to_peak)));
    }
    Ok(())
}
