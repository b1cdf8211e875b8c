//! Static template catalog.

use serde::Serialize;

/// A rich-text document template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Template {
    /// Stable catalog id.
    pub id: &'static str,
    /// Human-readable template name.
    pub name: &'static str,
    /// Product line the template targets.
    pub product: &'static str,
    /// Placeholder names appearing in the content.
    pub fields: &'static [&'static str],
    /// Rich-text body with `{{placeholder}}` markers.
    #[serde(skip_serializing_if = "str::is_empty")]
    pub content: &'static str,
}

const TEMPLATES: &[Template] = &[
    Template {
        id: "t1",
        name: "Phytosanitary Certificate",
        product: "avocado",
        fields: &["exporter", "farmer_id", "lot_number", "harvest_date"],
        content: "<h1>Phytosanitary Certificate</h1>\
            <p><strong>Exporter:</strong> {{exporter}}</p>\
            <p><strong>Farmer ID:</strong> {{farmer_id}}</p>\
            <p><strong>Lot Number:</strong> {{lot_number}}</p>\
            <p><strong>Harvest Date:</strong> {{harvest_date}}</p>",
    },
    Template {
        id: "t2",
        name: "Invoice",
        product: "generic",
        fields: &["buyer", "quantity", "unit_price", "currency"],
        content: "<h1>Invoice</h1>\
            <p><strong>Buyer:</strong> {{buyer}}</p>\
            <p><strong>Quantity:</strong> {{quantity}}</p>\
            <p><strong>Unit Price:</strong> {{unit_price}} {{currency}}</p>",
    },
    Template {
        id: "t3",
        name: "Bill of Lading",
        product: "generic",
        fields: &["vessel", "container_no", "port_of_loading", "port_of_discharge"],
        content: "<h1>Bill of Lading</h1>\
            <p><strong>Vessel:</strong> {{vessel}}</p>\
            <p><strong>Container No:</strong> {{container_no}}</p>\
            <p><strong>Port of Loading:</strong> {{port_of_loading}}</p>\
            <p><strong>Port of Discharge:</strong> {{port_of_discharge}}</p>",
    },
];

/// All templates in the catalog.
#[must_use]
pub const fn all() -> &'static [Template] {
    TEMPLATES
}

/// Look up a template by id.
#[must_use]
pub fn get(id: &str) -> Option<&'static Template> {
    TEMPLATES.iter().find(|t| t.id == id)
}
