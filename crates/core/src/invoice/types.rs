//! Invoice types consumed by move orchestration.

use bookmove_shared::types::{
    AccountId, CashRegisterId, CompanyId, InvoiceId, InvoiceLineId, JournalId, MoveId, MoveLineId,
    PartnerId,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::accounts::PaymentMode;
use crate::moves::MoveError;

/// The business direction of an invoice.
///
/// Replaces the legacy integer operation codes 1 through 4 with a closed
/// set; anything outside it is a configuration error at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationType {
    /// Supplier purchase (legacy code 1).
    SupplierPurchase,
    /// Supplier refund (legacy code 2).
    SupplierRefund,
    /// Customer sale (legacy code 3).
    CustomerSale,
    /// Customer refund (legacy code 4).
    CustomerRefund,
}

impl OperationType {
    /// Maps a legacy integer code, `None` for anything unknown.
    #[must_use]
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::SupplierPurchase),
            2 => Some(Self::SupplierRefund),
            3 => Some(Self::CustomerSale),
            4 => Some(Self::CustomerRefund),
            _ => None,
        }
    }

    /// The legacy integer code.
    #[must_use]
    pub fn code(self) -> i32 {
        match self {
            Self::SupplierPurchase => 1,
            Self::SupplierRefund => 2,
            Self::CustomerSale => 3,
            Self::CustomerRefund => 4,
        }
    }

    /// Returns true for the supplier-side operations.
    #[must_use]
    pub fn is_purchase(self) -> bool {
        matches!(self, Self::SupplierPurchase | Self::SupplierRefund)
    }

    /// Whether the customer account is debited, given whether the invoice
    /// total is negative.
    ///
    /// Base rule: supplier refunds and customer sales debit the customer;
    /// a negative total inverts the side.
    #[must_use]
    pub fn debit_customer(self, minus: bool) -> bool {
        let base = matches!(self, Self::SupplierRefund | Self::CustomerSale);
        base != minus
    }

    /// The refund counterpart of this operation. Refunds map to themselves.
    #[must_use]
    pub fn refund(self) -> Self {
        match self {
            Self::SupplierPurchase | Self::SupplierRefund => Self::SupplierRefund,
            Self::CustomerSale | Self::CustomerRefund => Self::CustomerRefund,
        }
    }
}

/// One revenue/expense row of an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceLine {
    /// Unique identifier.
    pub id: InvoiceLineId,
    /// The revenue or expense account the line posts to.
    pub account_id: AccountId,
    /// Line description.
    pub description: String,
    /// Tax-inclusive line total; negative on minus invoices.
    pub in_tax_total: Decimal,
}

/// The slice of an invoice the move engine reads and updates.
///
/// Owned by the invoicing subsystem; this crate only reads it, links the
/// generated move and refreshes `in_tax_total_remaining`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    /// Unique identifier.
    pub id: InvoiceId,
    /// Business direction; `None` is a configuration error.
    pub operation_type: Option<OperationType>,
    /// The company issuing or receiving the invoice.
    pub company_id: CompanyId,
    /// The counterparty.
    pub partner_id: PartnerId,
    /// The partner's receivable/payable account.
    pub partner_account_id: AccountId,
    /// The journal the invoice's move posts in.
    pub journal_id: JournalId,
    /// Invoice date; the move's accounting date.
    pub date: NaiveDate,
    /// Payment due date.
    pub due_date: NaiveDate,
    /// Expected settlement mode, if any.
    pub payment_mode: Option<PaymentMode>,
    /// Cash register for payment handling, if any.
    pub cash_register_id: Option<CashRegisterId>,
    /// Tax-inclusive invoice total; strictly negative on minus invoices.
    pub in_tax_total: Decimal,
    /// Unsettled part of the total, sign-adjusted like `in_tax_total`.
    pub in_tax_total_remaining: Decimal,
    /// The generated ledger move, once one exists.
    pub move_id: Option<MoveId>,
    /// Rejected-payment line taking precedence in customer-line lookups.
    pub reject_line_id: Option<MoveLineId>,
    /// For refunds, the invoices being refunded.
    pub original_invoice_ids: Vec<InvoiceId>,
    /// Revenue/expense rows.
    pub lines: Vec<InvoiceLine>,
}

impl Invoice {
    /// Returns true iff the tax-inclusive total is strictly negative.
    #[must_use]
    pub fn is_minus(&self) -> bool {
        self.in_tax_total < Decimal::ZERO
    }

    /// The operation type, or the configuration error for its absence.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::MissingOperationType`] when unset.
    pub fn operation(&self) -> Result<OperationType, MoveError> {
        self.operation_type
            .ok_or(MoveError::MissingOperationType(self.id))
    }

    /// Returns true for supplier-side invoices.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::MissingOperationType`] when the type is unset.
    pub fn is_purchase(&self) -> Result<bool, MoveError> {
        Ok(self.operation()?.is_purchase())
    }

    /// Whether the invoice's customer-account line sits on the debit side.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::MissingOperationType`] when the type is unset.
    pub fn is_debit_customer(&self) -> Result<bool, MoveError> {
        Ok(self.operation()?.debit_customer(self.is_minus()))
    }

    /// Builds the refund of this invoice: a new invoice with negated
    /// totals, the refund operation type, cleared move linkage and this
    /// invoice recorded as the original.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::MissingOperationType`] when the type is unset.
    pub fn to_refund(&self, date: NaiveDate, due_date: NaiveDate) -> Result<Self, MoveError> {
        let operation = self.operation()?;
        Ok(Self {
            id: InvoiceId::new(),
            operation_type: Some(operation.refund()),
            company_id: self.company_id,
            partner_id: self.partner_id,
            partner_account_id: self.partner_account_id,
            journal_id: self.journal_id,
            date,
            due_date,
            payment_mode: self.payment_mode,
            cash_register_id: self.cash_register_id,
            in_tax_total: -self.in_tax_total,
            in_tax_total_remaining: Decimal::ZERO,
            move_id: None,
            reject_line_id: None,
            original_invoice_ids: vec![self.id],
            lines: self
                .lines
                .iter()
                .map(|l| InvoiceLine {
                    id: InvoiceLineId::new(),
                    account_id: l.account_id,
                    description: l.description.clone(),
                    in_tax_total: -l.in_tax_total,
                })
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn invoice(operation: Option<OperationType>, total: Decimal) -> Invoice {
        Invoice {
            id: InvoiceId::new(),
            operation_type: operation,
            company_id: CompanyId::new(),
            partner_id: PartnerId::new(),
            partner_account_id: AccountId::new(),
            journal_id: JournalId::new(),
            date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2026, 2, 15).unwrap(),
            payment_mode: Some(PaymentMode::BankTransfer),
            cash_register_id: None,
            in_tax_total: total,
            in_tax_total_remaining: total,
            move_id: Some(MoveId::new()),
            reject_line_id: None,
            original_invoice_ids: Vec::new(),
            lines: vec![InvoiceLine {
                id: InvoiceLineId::new(),
                account_id: AccountId::new(),
                description: "Consulting".to_string(),
                in_tax_total: total,
            }],
        }
    }

    #[rstest]
    #[case(1, dec!(100), true, false)]
    #[case(1, dec!(-100), true, true)]
    #[case(2, dec!(100), true, true)]
    #[case(2, dec!(-100), true, false)]
    #[case(3, dec!(100), false, true)]
    #[case(3, dec!(-100), false, false)]
    #[case(4, dec!(100), false, false)]
    #[case(4, dec!(-100), false, true)]
    fn test_purchase_and_debit_customer_table(
        #[case] code: i32,
        #[case] total: Decimal,
        #[case] purchase: bool,
        #[case] debit: bool,
    ) {
        let inv = invoice(OperationType::from_code(code), total);
        assert_eq!(inv.is_purchase().unwrap(), purchase);
        assert_eq!(inv.is_debit_customer().unwrap(), debit);
    }

    #[test]
    fn test_unknown_codes_have_no_operation_type() {
        assert_eq!(OperationType::from_code(0), None);
        assert_eq!(OperationType::from_code(5), None);
        assert_eq!(OperationType::from_code(-1), None);
    }

    #[test]
    fn test_codes_round_trip() {
        for code in 1..=4 {
            let op = OperationType::from_code(code).unwrap();
            assert_eq!(op.code(), code);
        }
    }

    #[test]
    fn test_missing_operation_type_is_an_error() {
        let inv = invoice(None, dec!(100));
        let err = inv.is_purchase().unwrap_err();
        assert!(matches!(err, MoveError::MissingOperationType(id) if id == inv.id));
    }

    #[test]
    fn test_to_refund_negates_and_clears_linkage() {
        let inv = invoice(Some(OperationType::CustomerSale), dec!(120));
        let date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();

        let refund = inv.to_refund(date, date).unwrap();

        assert_eq!(refund.operation_type, Some(OperationType::CustomerRefund));
        assert_eq!(refund.in_tax_total, dec!(-120));
        assert_eq!(refund.in_tax_total_remaining, Decimal::ZERO);
        assert_eq!(refund.move_id, None);
        assert_eq!(refund.original_invoice_ids, vec![inv.id]);
        assert_eq!(refund.lines.len(), 1);
        assert_eq!(refund.lines[0].in_tax_total, dec!(-120));
        assert_ne!(refund.id, inv.id);
    }

    #[test]
    fn test_refund_of_refund_keeps_refund_type() {
        assert_eq!(
            OperationType::SupplierRefund.refund(),
            OperationType::SupplierRefund
        );
        assert_eq!(
            OperationType::CustomerRefund.refund(),
            OperationType::CustomerRefund
        );
    }
}
