//! VAT Decomposer: splitting tax-inclusive settled amounts into net/VAT.

use serde::{Deserialize, Serialize};

use eduledger_billing::TaxCode;
use eduledger_core::Money;

/// VAT rate in basis points of the net amount.
///
/// none/exempt → 0%, reduced → 8%, standard → 18%.
fn rate_basis_points(code: TaxCode) -> i128 {
    match code {
        TaxCode::None | TaxCode::Exempt => 0,
        TaxCode::Reduced => 800,
        TaxCode::Standard => 1800,
    }
}

/// Decomposition of a tax-inclusive (gross) amount.
///
/// `net + vat == gross` holds exactly: net is rounded half-up in minor units
/// and VAT takes the difference.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VatBreakdown {
    pub net: Money,
    pub vat: Money,
    pub gross: Money,
}

impl VatBreakdown {
    /// Decompose a gross settled amount under the given tax code.
    ///
    /// The gross amount is already tax-inclusive and is never changed:
    /// `net = gross / (1 + rate)`, `vat = gross − net`.
    pub fn decompose(gross: Money, code: TaxCode) -> VatBreakdown {
        let bp = rate_basis_points(code);
        if bp == 0 || !gross.is_positive() {
            return VatBreakdown {
                net: gross,
                vat: Money::ZERO,
                gross,
            };
        }
        let denominator = 10_000 + bp;
        let numerator = gross.minor() as i128 * 10_000;
        let net = Money::from_minor(((numerator + denominator / 2) / denominator) as i64);
        VatBreakdown {
            net,
            vat: gross - net,
            gross,
        }
    }
}

/// Tax summary for a receipt group.
///
/// A group with mixed tax codes has no single decomposition; only the summed
/// gross is exposed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TaxSummary {
    Uniform {
        code: TaxCode,
        breakdown: VatBreakdown,
    },
    Mixed {
        gross: Money,
    },
}

impl TaxSummary {
    pub fn gross(&self) -> Money {
        match self {
            TaxSummary::Uniform { breakdown, .. } => breakdown.gross,
            TaxSummary::Mixed { gross } => *gross,
        }
    }
}
