use serde::{Deserialize, Serialize};

/// The extracted invoice record — everything the summary renderer needs.
///
/// Source XML is best-effort: every scalar is optional and an absent
/// element leaves its field `None`. All values are carried as the raw
/// strings found in the document; no numeric or date validation happens
/// here. The record is built once by [`crate::ubl::from_ubl_xml`] and
/// only read afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvoiceData {
    /// BT-1: Invoice number.
    pub invoice_id: Option<String>,
    /// BT-2: Issue date, raw `YYYY-MM-DD`.
    pub issue_date: Option<String>,
    /// BT-9: Due date, raw `YYYY-MM-DD`.
    pub due_date: Option<String>,
    /// BT-3: Invoice type code (UNTDID 1001).
    pub invoice_type_code: Option<String>,
    /// BT-22: Free-text note. Pipe characters separate paragraphs.
    pub note: Option<String>,
    /// BT-5: Document currency code.
    pub currency: Option<String>,
    /// BT-10: Buyer reference (Leitweg-ID).
    pub buyer_reference: Option<String>,
    /// BG-14: Invoicing period start, raw `YYYY-MM-DD`.
    pub period_start: Option<String>,
    /// BG-14: Invoicing period end, raw `YYYY-MM-DD`.
    pub period_end: Option<String>,
    /// BT-23: Business process / profile identifier.
    pub profile_id: Option<String>,
    /// BT-24: Specification / customization identifier.
    pub customization_id: Option<String>,
    /// BG-4: Seller.
    pub supplier: PartyData,
    /// BG-7: Buyer.
    pub customer: PartyData,
    /// BG-16: Payment instructions.
    pub payment_means: PaymentMeansData,
    /// BG-22/BG-23: Document-level tax total with a single subtotal.
    pub tax_total: TaxTotalData,
    /// BG-22: Document totals.
    pub monetary_total: MonetaryTotalData,
    /// BG-25: Invoice lines, in document order.
    pub items: Vec<LineItemData>,
    /// BG-24: Additional document references, in document order.
    ///
    /// Correlated with physically extracted attachment files by sequence
    /// position only — the correlation is never checked.
    pub additional_documents: Vec<DocumentReference>,
}

/// A party (seller or buyer). The contact sub-record is only populated
/// for the seller; buyer documents rarely carry one and the renderer
/// never reads it for the buyer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartyData {
    pub endpoint_id: Option<String>,
    pub name: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub postal_zone: Option<String>,
    pub country_code: Option<String>,
    /// VAT identifier from `PartyTaxScheme/CompanyID`.
    pub company_id: Option<String>,
    pub registration_name: Option<String>,
    pub contact: ContactData,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactData {
    pub name: Option<String>,
    pub telephone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentMeansData {
    /// UNTDID 4461 code.
    pub means_code: Option<String>,
    /// Remittance information / payment reference.
    pub payment_id: Option<String>,
    pub account: FinancialAccountData,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FinancialAccountData {
    /// Account identifier, usually an IBAN.
    pub id: Option<String>,
    /// Account holder name.
    pub name: Option<String>,
    /// BIC from `FinancialInstitutionBranch/ID`.
    pub bic: Option<String>,
}

/// Document-level tax total. Only a single subtotal/category is carried;
/// multi-rate invoices are not aggregated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaxTotalData {
    pub tax_amount: Option<String>,
    pub subtotal: TaxSubtotalData,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaxSubtotalData {
    pub taxable_amount: Option<String>,
    pub tax_amount: Option<String>,
    pub category: TaxCategoryData,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaxCategoryData {
    /// UNTDID 5305 category code (e.g. "S").
    pub id: Option<String>,
    pub percent: Option<String>,
    pub scheme_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonetaryTotalData {
    pub line_extension_amount: Option<String>,
    pub tax_exclusive_amount: Option<String>,
    pub tax_inclusive_amount: Option<String>,
    pub allowance_total_amount: Option<String>,
    pub charge_total_amount: Option<String>,
    pub payable_amount: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineItemData {
    pub id: Option<String>,
    pub quantity: Option<String>,
    /// `unitCode` attribute of the invoiced quantity.
    pub quantity_unit: Option<String>,
    pub line_extension_amount: Option<String>,
    pub item_name: Option<String>,
    pub tax_category: TaxCategoryData,
    pub price_amount: Option<String>,
    /// `currencyID` attribute of the price amount.
    pub price_currency: Option<String>,
    pub base_quantity: Option<String>,
    pub base_quantity_unit: Option<String>,
}

/// One `AdditionalDocumentReference` — a pointer to a supporting
/// document. The matching attachment file, if any, shares its sequence
/// position.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentReference {
    pub id: Option<String>,
    pub description: Option<String>,
}
