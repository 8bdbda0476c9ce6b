use serde::Serialize;
use utoipa::ToSchema;

/// Monthly payment plans offered on every product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum InstallmentPlan {
    Months6,
    Months12,
    Months24,
}

impl InstallmentPlan {
    pub const ALL: [InstallmentPlan; 3] = [
        InstallmentPlan::Months6,
        InstallmentPlan::Months12,
        InstallmentPlan::Months24,
    ];

    pub fn months(self) -> u32 {
        match self {
            InstallmentPlan::Months6 => 6,
            InstallmentPlan::Months12 => 12,
            InstallmentPlan::Months24 => 24,
        }
    }

    pub fn from_months(months: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|plan| plan.months() == months)
    }
}

/// `price` reduced by `discount` percent. A zero discount returns the
/// price untouched. Not rounded.
pub fn discounted_price(price: i64, discount: i32) -> f64 {
    if discount > 0 {
        price as f64 * (1.0 - f64::from(discount) / 100.0)
    } else {
        price as f64
    }
}

/// Monthly amount for `plan`. Not rounded.
pub fn installment(price: i64, plan: InstallmentPlan) -> f64 {
    price as f64 / f64::from(plan.months())
}

/// Every price figure derived from a product's stored price and discount.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct PriceBreakdown {
    pub discounted_price: f64,
    pub pay_monthly_6: f64,
    pub pay_monthly_12: f64,
    pub pay_monthly_24: f64,
}

impl PriceBreakdown {
    pub fn new(price: i64, discount: i32) -> Self {
        Self {
            discounted_price: discounted_price(price, discount),
            pay_monthly_6: installment(price, InstallmentPlan::Months6),
            pay_monthly_12: installment(price, InstallmentPlan::Months12),
            pay_monthly_24: installment(price, InstallmentPlan::Months24),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_discount_keeps_price() {
        assert_eq!(discounted_price(1000, 0), 1000.0);
    }

    #[test]
    fn twenty_percent_off() {
        assert_eq!(discounted_price(1000, 20), 800.0);
        assert_eq!(discounted_price(1000, 100), 0.0);
    }

    #[test]
    fn installments_divide_the_full_price() {
        assert_eq!(installment(1200, InstallmentPlan::Months6), 200.0);
        assert_eq!(installment(1200, InstallmentPlan::Months12), 100.0);
        assert_eq!(installment(1200, InstallmentPlan::Months24), 50.0);
        assert_eq!(installment(1000, InstallmentPlan::Months6), 1000.0 / 6.0);
    }

    #[test]
    fn installments_ignore_discount() {
        let breakdown = PriceBreakdown::new(1200, 50);
        assert_eq!(breakdown.discounted_price, 600.0);
        assert_eq!(breakdown.pay_monthly_6, 200.0);
    }

    #[test]
    fn only_known_plans_parse() {
        assert_eq!(InstallmentPlan::from_months(12), Some(InstallmentPlan::Months12));
        assert_eq!(InstallmentPlan::from_months(3), None);
    }
}
