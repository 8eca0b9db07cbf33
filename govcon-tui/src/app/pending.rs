use super::*;
use govcon::domain::{BatchUpdateRates, BatchUpdateResources, LcatRateUpdate, UpdateResource};
use rust_decimal::Decimal;
use time::OffsetDateTime;

pub const RESOURCE_BATCH_NOTES: &str = "Batch resource update";
pub const RATE_BATCH_NOTES: &str = "Batch rate update";

impl App {
    pub fn has_pending_edits(&self) -> bool {
        !self.pending_resource_rates.is_empty() || !self.pending_lcat_rates.is_empty()
    }

    pub fn stage_resource_rate(&mut self, id: ResourceId, hourly_rate: Decimal) {
        let Some(resource) = self.resources.iter().find(|r| r.id == id) else {
            return;
        };
        if resource.hourly_rate == hourly_rate {
            self.pending_resource_rates.remove(&id);
            return;
        }
        let label = resource.full_name.clone();
        self.pending_resource_rates.insert(
            id,
            PendingRate {
                label,
                hourly_rate: Some(hourly_rate),
                published_rate: None,
                default_bill_rate: None,
            },
        );
    }

    pub fn stage_lcat_rates(
        &mut self,
        id: LcatId,
        published_rate: Option<Decimal>,
        default_bill_rate: Option<Decimal>,
    ) {
        let Some(lcat) = self.lcats.iter().find(|l| l.id == id) else {
            return;
        };
        let published = published_rate.filter(|r| Some(*r) != lcat.current_published_rate);
        let bill = default_bill_rate.filter(|r| Some(*r) != lcat.current_default_bill_rate);
        if published.is_none() && bill.is_none() {
            self.pending_lcat_rates.remove(&id);
            return;
        }
        let label = lcat.name.clone();
        self.pending_lcat_rates.insert(
            id,
            PendingRate {
                label,
                hourly_rate: None,
                published_rate: published,
                default_bill_rate: bill,
            },
        );
    }

    pub fn discard_pending_edits(&mut self) {
        self.pending_resource_rates.clear();
        self.pending_lcat_rates.clear();
    }

    /// Staged hourly-rate changes as one request, or `None` when nothing is staged.
    pub fn resource_batch(&self, effective_date: OffsetDateTime) -> Option<BatchUpdateResources> {
        if self.pending_resource_rates.is_empty() {
            return None;
        }
        Some(BatchUpdateResources {
            effective_date,
            notes: Some(RESOURCE_BATCH_NOTES.to_string()),
            resource_updates: self
                .pending_resource_rates
                .iter()
                .map(|(id, pending)| UpdateResource {
                    hourly_rate: pending.hourly_rate,
                    ..UpdateResource::new(id.clone())
                })
                .collect(),
        })
    }

    pub fn rate_batch(&self, effective_date: OffsetDateTime) -> Option<BatchUpdateRates> {
        if self.pending_lcat_rates.is_empty() {
            return None;
        }
        Some(BatchUpdateRates {
            effective_date,
            notes: RATE_BATCH_NOTES.to_string(),
            rate_updates: self
                .pending_lcat_rates
                .iter()
                .map(|(id, pending)| LcatRateUpdate {
                    published_rate: pending.published_rate,
                    default_bill_rate: pending.default_bill_rate,
                    ..LcatRateUpdate::new(id.clone())
                })
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use rust_decimal_macros::dec;
    use time::macros::datetime;

    const NOW: OffsetDateTime = datetime!(2025-06-01 00:00:00 UTC);

    fn lcat(id: &str, bill: Decimal) -> Lcat {
        Lcat {
            id: LcatId::new(id),
            name: format!("LCAT {}", id),
            description: String::new(),
            current_published_rate: Some(dec!(150)),
            current_default_bill_rate: Some(bill),
            position_titles: vec![],
            is_active: true,
            created_date: NOW,
            modified_date: None,
        }
    }

    #[test]
    fn staged_resource_rates_become_one_batch() {
        let mut app = app();
        app.set_resources(vec![
            resource("r-1", "Dana", Some(dec!(175))),
            resource("r-2", "Marcus", Some(dec!(150))),
        ]);
        assert!(app.resource_batch(NOW).is_none());

        app.stage_resource_rate(ResourceId::new("r-2"), dec!(55));
        app.stage_resource_rate(ResourceId::new("r-1"), dec!(65));
        // Unknown ids are ignored.
        app.stage_resource_rate(ResourceId::new("r-9"), dec!(10));

        let batch = app.resource_batch(NOW).unwrap();
        assert_eq!(batch.notes.as_deref(), Some("Batch resource update"));
        let ids: Vec<_> = batch.resource_updates.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["r-1", "r-2"]);
        assert_eq!(batch.resource_updates[1].hourly_rate, Some(dec!(55)));
    }

    #[test]
    fn restaging_the_current_rate_unstages() {
        let mut app = app();
        app.set_resources(vec![resource("r-1", "Dana", None)]);
        app.stage_resource_rate(ResourceId::new("r-1"), dec!(65));
        app.stage_resource_rate(ResourceId::new("r-1"), dec!(50));
        assert!(!app.has_pending_edits());
    }

    #[test]
    fn rate_batch_only_carries_changed_rates() {
        let mut app = app();
        app.set_lcats(vec![lcat("l-1", dec!(175)), lcat("l-2", dec!(120))]);
        app.stage_lcat_rates(LcatId::new("l-1"), Some(dec!(150)), Some(dec!(180)));
        app.stage_lcat_rates(LcatId::new("l-2"), Some(dec!(150)), Some(dec!(120)));

        let batch = app.rate_batch(NOW).unwrap();
        assert_eq!(batch.notes, "Batch rate update");
        assert_eq!(batch.rate_updates.len(), 1);
        assert_eq!(batch.rate_updates[0].published_rate, None);
        assert_eq!(batch.rate_updates[0].default_bill_rate, Some(dec!(180)));

        app.discard_pending_edits();
        assert!(app.rate_batch(NOW).is_none());
    }
}
