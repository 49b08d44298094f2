//! The configurator's quote state machine.
//!
//! Every mutation keeps the quote in a displayable state: numeric input
//! that fails to parse degrades to a fallback value (0 for money fields,
//! 1 for quantity) instead of erroring, so the live preview always renders
//! a number. The only strict check is [`Quote::validate_for_order`], at the
//! submission boundary.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use dealerdesk_catalog::records::{ExemptionTiers, Version};
use dealerdesk_core::{ColorId, DomainError, DomainResult, Money, OptionalId, VersionId};

/// The color picked for the current configuration, with its resolved
/// per-version surcharge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedColor {
    pub color_id: ColorId,
    pub price: Money,
}

/// Itemized result of one recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceBreakdown {
    pub base_price: Money,
    pub color_price: Money,
    pub optionals_price: Money,
    /// `color_price + optionals_price`, "Pintura + Opcionais".
    pub extras_price: Money,
    pub subtotal: Money,
    pub discount_amount: Money,
    pub with_discount: Money,
    pub markup_amount: Money,
    pub with_markup: Money,
    pub quantity: u32,
    pub final_price: Money,
}

/// Session-local price configuration.
///
/// Created when a version is selected, recomputed on every field change,
/// discarded on navigation. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Quote {
    version_id: Option<VersionId>,
    base_price: Money,
    exemption_tiers: Option<ExemptionTiers>,
    color: Option<SelectedColor>,
    optionals: BTreeMap<OptionalId, Money>,
    discount_percent: Decimal,
    discount_amount: Money,
    markup: Money,
    /// Kept as entered; clamped to ≥ 1 only when computing totals.
    quantity: i64,
}

impl Quote {
    pub fn new() -> Self {
        Self {
            quantity: 1,
            ..Self::default()
        }
    }

    /// Select a version: base price and the four displayed exemption tiers
    /// come from the record verbatim. Color and optional selections are
    /// cleared (they are version-specific); the discount pair is left as
    /// entered, even though it no longer derives from the new base price,
    /// until the user touches either field again.
    pub fn select_version(&mut self, version: &Version) {
        self.version_id = Some(version.id);
        self.base_price = version.base_public_price;
        self.exemption_tiers = Some(version.exemption_tiers);
        self.color = None;
        self.optionals.clear();
    }

    pub fn select_color(&mut self, selection: Option<SelectedColor>) {
        self.color = selection;
    }

    pub fn add_optional(&mut self, optional_id: OptionalId, price: Money) {
        self.optionals.insert(optional_id, price);
    }

    pub fn remove_optional(&mut self, optional_id: OptionalId) {
        self.optionals.remove(&optional_id);
    }

    pub fn clear_optionals(&mut self) {
        self.optionals.clear();
    }

    /// Set the discount as a percentage and derive the amount from the
    /// current base price. With no positive base price the amount is forced
    /// to zero.
    pub fn set_discount_percent(&mut self, percent: Decimal) {
        self.discount_percent = percent;
        self.discount_amount = if self.base_price.is_positive() {
            self.base_price.percent_of(percent)
        } else {
            Money::ZERO
        };
    }

    /// Set the discount as an amount and derive the percentage, the inverse
    /// of [`Quote::set_discount_percent`] at a fixed base price.
    pub fn set_discount_amount(&mut self, amount: Money) {
        self.discount_amount = amount;
        self.discount_percent = if self.base_price.is_positive() {
            amount.percent_against(self.base_price)
        } else {
            Decimal::ZERO
        };
    }

    /// Markup is stored as-is; a negative markup is an extra discount.
    pub fn set_markup(&mut self, markup: Money) {
        self.markup = markup;
    }

    /// Quantity is stored as entered; totals substitute 1 for anything
    /// below it, and only order submission rejects it.
    pub fn set_quantity(&mut self, quantity: i64) {
        self.quantity = quantity;
    }

    /// Lenient form-input setters: unparsable text degrades to the field's
    /// fallback instead of surfacing an error.
    pub fn set_discount_percent_input(&mut self, input: &str) {
        let percent = Money::parse_brl(input)
            .map(|m| m.amount())
            .unwrap_or(Decimal::ZERO);
        self.set_discount_percent(percent);
    }

    pub fn set_discount_amount_input(&mut self, input: &str) {
        self.set_discount_amount(Money::parse_brl(input).unwrap_or(Money::ZERO));
    }

    pub fn set_markup_input(&mut self, input: &str) {
        self.set_markup(Money::parse_brl(input).unwrap_or(Money::ZERO));
    }

    pub fn set_quantity_input(&mut self, input: &str) {
        self.set_quantity(input.trim().parse::<i64>().unwrap_or(1));
    }

    pub fn version_id(&self) -> Option<VersionId> {
        self.version_id
    }

    pub fn base_price(&self) -> Money {
        self.base_price
    }

    pub fn exemption_tiers(&self) -> Option<&ExemptionTiers> {
        self.exemption_tiers.as_ref()
    }

    pub fn selected_color(&self) -> Option<SelectedColor> {
        self.color
    }

    pub fn selected_optionals(&self) -> impl Iterator<Item = (OptionalId, Money)> + '_ {
        self.optionals.iter().map(|(id, price)| (*id, *price))
    }

    pub fn discount_percent(&self) -> Decimal {
        self.discount_percent
    }

    pub fn discount_amount(&self) -> Money {
        self.discount_amount
    }

    pub fn markup(&self) -> Money {
        self.markup
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    fn effective_quantity(&self) -> u32 {
        self.quantity.max(1).min(u32::MAX as i64) as u32
    }

    /// Pure recomputation of the full breakdown from current state.
    pub fn totals(&self) -> PriceBreakdown {
        let color_price = self.color.map(|c| c.price).unwrap_or(Money::ZERO);
        let optionals_price = self
            .optionals
            .values()
            .fold(Money::ZERO, |sum, price| sum + *price);
        let extras_price = color_price + optionals_price;

        let subtotal = self.base_price + extras_price;
        let with_discount = subtotal - self.discount_amount;
        let with_markup = with_discount + self.markup;
        let quantity = self.effective_quantity();
        let final_price = with_markup.times(quantity);

        PriceBreakdown {
            base_price: self.base_price,
            color_price,
            optionals_price,
            extras_price,
            subtotal,
            discount_amount: self.discount_amount,
            with_discount,
            markup_amount: self.markup,
            with_markup,
            quantity,
            final_price,
        }
    }

    /// Submission-boundary validation: the leniency of the live preview
    /// stops here.
    pub fn validate_for_order(&self) -> DomainResult<()> {
        if self.version_id.is_none() {
            return Err(DomainError::validation("no version selected"));
        }
        if self.quantity < 1 {
            return Err(DomainError::validation("quantity must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use dealerdesk_catalog::records::ExemptionTiers;
    use dealerdesk_core::ModelId;

    use super::*;

    fn version(base_units: i64) -> Version {
        let base = Money::from_major(base_units);
        Version {
            id: VersionId::new(),
            model_id: ModelId::new(),
            name: "Comfortline TSI 116CV".to_string(),
            base_public_price: base,
            exemption_tiers: ExemptionTiers::suggested_from_list(base),
        }
    }

    fn color(price_units: i64) -> SelectedColor {
        SelectedColor {
            color_id: ColorId::new(),
            price: Money::from_major(price_units),
        }
    }

    #[test]
    fn discount_setters_are_mutual_inverses_at_fixed_base() {
        let mut quote = Quote::new();
        quote.select_version(&version(100_000));

        quote.set_discount_percent(Decimal::from(10));
        assert_eq!(quote.discount_amount(), Money::from_major(10_000));

        let mut quote = Quote::new();
        quote.select_version(&version(100_000));
        quote.set_discount_amount(Money::from_major(10_000));
        assert_eq!(quote.discount_percent(), Decimal::from(10));
    }

    #[test]
    fn discount_amount_forced_to_zero_without_base_price() {
        let mut quote = Quote::new();
        quote.set_discount_percent(Decimal::from(10));
        assert_eq!(quote.discount_amount(), Money::ZERO);

        quote.set_discount_amount(Money::from_major(500));
        assert_eq!(quote.discount_percent(), Decimal::ZERO);
    }

    #[test]
    fn final_price_scenario_with_color_and_optional() {
        let mut quote = Quote::new();
        quote.select_version(&version(105_990));
        quote.select_color(Some(color(1_650)));
        quote.add_optional(OptionalId::new(), Money::from_major(800));
        quote.set_discount_amount(Money::from_major(5_000));
        quote.set_markup(Money::ZERO);
        quote.set_quantity(2);

        let totals = quote.totals();
        assert_eq!(totals.extras_price, Money::from_major(2_450));
        assert_eq!(totals.subtotal, Money::from_major(107_640));
        assert_eq!(totals.with_discount, Money::from_major(102_640));
        assert_eq!(totals.final_price, Money::from_major(205_280));
    }

    #[test]
    fn negative_markup_acts_as_extra_discount() {
        let mut quote = Quote::new();
        quote.select_version(&version(50_000));
        quote.set_markup(Money::from_major(-1_000));

        assert_eq!(quote.totals().final_price, Money::from_major(49_000));
    }

    #[test]
    fn quantity_below_one_computes_as_one() {
        for raw in [0i64, -3] {
            let mut quote = Quote::new();
            quote.select_version(&version(10_000));
            quote.set_quantity(raw);

            let totals = quote.totals();
            assert_eq!(totals.quantity, 1);
            assert_eq!(totals.final_price, Money::from_major(10_000));
        }
    }

    #[test]
    fn unparsable_inputs_degrade_to_fallbacks() {
        let mut quote = Quote::new();
        quote.select_version(&version(10_000));

        quote.set_discount_percent_input("abc");
        assert_eq!(quote.discount_amount(), Money::ZERO);

        quote.set_discount_amount_input("");
        assert_eq!(quote.discount_amount(), Money::ZERO);

        quote.set_markup_input("not a number");
        assert_eq!(quote.markup(), Money::ZERO);

        quote.set_quantity_input("NaN");
        assert_eq!(quote.totals().quantity, 1);
    }

    #[test]
    fn form_inputs_accept_brazilian_formatting() {
        let mut quote = Quote::new();
        quote.select_version(&version(105_990));

        quote.set_discount_amount_input("5.000,00");
        assert_eq!(quote.discount_amount(), Money::from_major(5_000));

        quote.set_discount_percent_input("10,5");
        assert_eq!(
            quote.discount_amount(),
            Money::from_major(105_990).percent_of(Decimal::new(105, 1))
        );
    }

    #[test]
    fn version_change_clears_color_and_optionals() {
        let mut quote = Quote::new();
        quote.select_version(&version(105_990));
        quote.select_color(Some(color(1_650)));
        quote.add_optional(OptionalId::new(), Money::from_major(800));
        assert_eq!(quote.totals().extras_price, Money::from_major(2_450));

        quote.select_version(&version(89_990));
        assert_eq!(quote.totals().extras_price, Money::ZERO);
        assert_eq!(quote.selected_color(), None);
        assert_eq!(quote.selected_optionals().count(), 0);
    }

    #[test]
    fn discount_pair_goes_stale_when_version_changes() {
        // Known surprise preserved from the legacy behavior: changing the
        // base price re-derives neither discount field. The pair only
        // becomes consistent again when one of them is re-entered.
        let mut quote = Quote::new();
        quote.select_version(&version(100_000));
        quote.set_discount_percent(Decimal::from(10));
        assert_eq!(quote.discount_amount(), Money::from_major(10_000));

        quote.select_version(&version(50_000));
        assert_eq!(quote.discount_percent(), Decimal::from(10));
        assert_eq!(quote.discount_amount(), Money::from_major(10_000));

        quote.set_discount_percent(Decimal::from(10));
        assert_eq!(quote.discount_amount(), Money::from_major(5_000));
    }

    #[test]
    fn exemption_tiers_pass_through_untouched() {
        let mut v = version(100_000);
        // Stored tiers that diverge from the prefill ratios must display
        // exactly as stored.
        v.exemption_tiers.pcd_ipi = Money::from_major(91_111);

        let mut quote = Quote::new();
        quote.select_version(&v);
        assert_eq!(
            quote.exemption_tiers().unwrap().pcd_ipi,
            Money::from_major(91_111)
        );
    }

    #[test]
    fn removing_an_optional_updates_extras() {
        let mut quote = Quote::new();
        quote.select_version(&version(80_000));

        let sunroof = OptionalId::new();
        let sound = OptionalId::new();
        quote.add_optional(sunroof, Money::from_major(3_000));
        quote.add_optional(sound, Money::from_major(1_200));
        assert_eq!(quote.totals().optionals_price, Money::from_major(4_200));

        quote.remove_optional(sunroof);
        assert_eq!(quote.totals().optionals_price, Money::from_major(1_200));

        // Re-adding the same optional replaces, never duplicates.
        quote.add_optional(sound, Money::from_major(1_200));
        assert_eq!(quote.totals().optionals_price, Money::from_major(1_200));
    }

    #[test]
    fn validate_for_order_enforces_what_the_preview_forgives() {
        let mut quote = Quote::new();
        assert_eq!(
            quote.validate_for_order(),
            Err(DomainError::validation("no version selected"))
        );

        quote.select_version(&version(10_000));
        quote.set_quantity(0);
        assert_eq!(
            quote.validate_for_order(),
            Err(DomainError::validation("quantity must be at least 1"))
        );

        quote.set_quantity(2);
        assert_eq!(quote.validate_for_order(), Ok(()));
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 1000,
                ..ProptestConfig::default()
            })]

            /// Property: percent → amount → percent round-trips exactly for
            /// whole-unit base prices and whole percentages.
            #[test]
            fn discount_round_trip(base in 1_000i64..1_000_000, percent in 0i64..=100) {
                let mut quote = Quote::new();
                quote.select_version(&version(base));

                quote.set_discount_percent(Decimal::from(percent));
                let amount = quote.discount_amount();

                quote.set_discount_amount(amount);
                prop_assert_eq!(quote.discount_percent(), Decimal::from(percent));
            }

            /// Property: totals never panic and scale linearly in quantity.
            #[test]
            fn final_price_scales_with_quantity(
                base in 0i64..1_000_000,
                extras in 0i64..50_000,
                quantity in -5i64..500,
            ) {
                let mut quote = Quote::new();
                quote.select_version(&version(base));
                quote.select_color(Some(color(extras)));
                quote.set_quantity(quantity);

                let totals = quote.totals();
                let unit = totals.with_markup;
                prop_assert_eq!(totals.final_price, unit.times(totals.quantity));
                prop_assert!(totals.quantity >= 1);
            }
        }
    }
}
