use rust_decimal::Decimal;

/// What the taxpayer owes, or is owed, once withholding is credited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settlement {
    pub tax: Decimal,
    /// `None` means no refund at all, which is distinct from a zero refund.
    pub refund: Option<Decimal>,
}

impl Settlement {
    /// Signed view: `tax - refund`.
    pub fn net(&self) -> Decimal {
        self.tax - self.refund.unwrap_or(Decimal::ZERO)
    }
}

/// Splits a signed net tax into a (tax, refund) pair.
pub fn format_net_tax(net_tax: Decimal) -> Settlement {
    if net_tax < Decimal::ZERO {
        Settlement {
            tax: Decimal::ZERO,
            refund: Some(net_tax.abs()),
        }
    } else {
        Settlement {
            tax: net_tax,
            refund: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn positive_net_is_tax_without_refund() {
        let settlement = format_net_tax(dec!(4000));

        assert_eq!(
            settlement,
            Settlement {
                tax: dec!(4000),
                refund: None,
            }
        );
    }

    #[test]
    fn zero_net_has_no_refund() {
        let settlement = format_net_tax(Decimal::ZERO);

        assert_eq!(settlement.tax, Decimal::ZERO);
        assert_eq!(settlement.refund, None);
    }

    #[test]
    fn negative_net_becomes_refund() {
        let settlement = format_net_tax(dec!(-1000));

        assert_eq!(
            settlement,
            Settlement {
                tax: Decimal::ZERO,
                refund: Some(dec!(1000)),
            }
        );
    }

    #[test]
    fn net_is_preserved_and_never_both_nonzero() {
        for net in [dec!(-12345.67), dec!(-0.01), dec!(0), dec!(0.01), dec!(310000.35)] {
            let settlement = format_net_tax(net);

            assert_eq!(settlement.net(), net);
            let refund = settlement.refund.unwrap_or(Decimal::ZERO);
            assert!(settlement.tax.is_zero() || refund.is_zero(), "net {net}");
            assert!(settlement.tax >= Decimal::ZERO && refund >= Decimal::ZERO);
        }
    }
}
