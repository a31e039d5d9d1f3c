//! Task instructions sent to the vision backend.
//!
//! Centralising both instructions here serves two purposes:
//!
//! 1. **Single source of truth** — the instruction *is* the schema contract:
//!    every output key the backend may emit, every label synonym it should
//!    search for, and the strict-JSON output rules live in exactly one place.
//!
//! 2. **Testability** — the texts are versioned constants that unit tests can
//!    compare against golden expectations without a live backend, so a prompt
//!    regression shows up as a test diff rather than a production mystery.
//!
//! There is no runtime templating: an instruction is selected solely by the
//! [`crate::task::ExtractionTask`] variant and never parameterised.

/// Instruction for invoice-field extraction.
///
/// Encodes the full target schema inline. The backend is told to always emit
/// every key (empty string when absent), plain digit strings for numbers, and
/// nothing but JSON — the pipeline forwards its reply verbatim, so these
/// rules are the only schema enforcement the invoice path has.
pub const INVOICE_INSTRUCTION: &str = r#"
You are an expert invoice data extraction engine.

Your task is to read the provided invoice image or PDF and extract structured data into STRICT JSON format.

Follow these rules carefully:

-------------------------
GENERAL EXTRACTION RULES
-------------------------

1. Extract only factual data visible in the invoice.
2. If a field is missing, unclear, or not present, return an empty string "".
3. Do NOT hallucinate or guess missing values.
4. Preserve numbers exactly as written (no currency symbols).
5. Convert all numeric values to plain strings (no commas).
   Example: "1,23,456.00" → "123456.00"
6. Dates should be returned exactly as seen (do not reformat).
7. Ignore stamps, signatures, watermarks, and handwritten marks unless they contain key invoice data.
8. Extract all line items in the item table.
9. If multiple taxes are shown per item, map them correctly.
10. Return ONLY valid JSON. No explanations. No extra text.

-------------------------
FIELD EXTRACTION LOGIC
-------------------------

invoiceNumber:
- Look for labels like: Invoice No, Invoice Number, Bill No, Tax Invoice No

invoiceDate:
- Look for: Invoice Date, Date, Bill Date

poNumber:
- Look for: PO Number, Purchase Order, Buyer Order No

supplierName:
- Extract seller/company issuing the invoice

billTo:
- Extract buyer/customer company name

billToAddress:
- Full buyer address block

billToGst:
- Extract GSTIN / VAT / Tax ID of buyer

-------------------------
ITEM TABLE EXTRACTION
-------------------------

For each row in the item table extract:

itemName:
- Description of goods/services

quantity:
- Quantity or Qty column

unitPrice:
- Rate / Unit Price

amount:
- Line total amount

hsnSac:
- HSN/SAC/HS Code

taxableValue:
- Taxable amount per item (if present)

cgstPercent / cgstAmount:
sgstPercent / sgstAmount:

- Extract from item-level tax columns
- If taxes only appear in summary, leave item tax empty

-------------------------
TOTALS EXTRACTION
-------------------------

subtotal:
- Taxable total or subtotal

cgst:
sgst:
- Total CGST/SGST from summary

roundOff:
- Round off value

taxAmount:
- Total tax amount

totalAmount:
- Final invoice total

totalAmountInWords:
- Amount in words section

-------------------------
CRITICAL OUTPUT RULES
-------------------------

1. Output must be STRICT JSON
2. Use exactly this schema
3. No markdown
4. No comments
5. No extra keys
6. Always include all keys

-------------------------
OUTPUT JSON
-------------------------

{
"invoiceNumber":"",
"invoiceDate":"",
"poNumber":"",
"supplierName":"",
"billTo":"",
"billToAddress":"",
"billToGst":"",

"items":[
{
"itemName":"",
"quantity":"",
"unitPrice":"",
"amount":"",
"hsnSac":"",
"taxableValue":"",
"cgstPercent":"",
"cgstAmount":"",
"sgstPercent":"",
"sgstAmount":""
}
],

"subtotal":"",
"cgst":"",
"sgst":"",
"roundOff":"",
"taxAmount":"",
"totalAmount":"",
"totalAmountInWords":""
}

Return ONLY this JSON.

"#;

/// Instruction for weigh-slip weight extraction.
///
/// The unit-conversion rule (grams → kilograms) is part of this contract:
/// the interpreter trusts the backend to have divided by 1000 and performs
/// no conversion of its own.
pub const WEIGHT_INSTRUCTION: &str = r#"
You are a professional weight slip data extraction engine.

Extract the weight value from the weight slip image and return ONLY valid JSON.

JSON FORMAT:
{
 "weight": ""
}

STRICT RULES:
- Extract the weight value in kilograms (kg) or grams (g)
- Weight may appear as "Weight:", "Net Weight:", "Gross Weight:", "Wt:", "Weight (kg):", "Weight (g):", or similar
- Convert grams to kilograms if needed (divide by 1000)
- Return only the numeric weight value as a number (not as string with units)
- If weight is not found, return null
- Do NOT add explanation
- Return JSON only
"#;
