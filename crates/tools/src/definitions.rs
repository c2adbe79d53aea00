//! Descriptors sent to the model with every tool-selection call

use once_cell::sync::Lazy;
use travel_desk_core::ToolDefinition;

use crate::kind::ToolKind;
use crate::schema::{InputSchema, PropertySchema};

/// Values the model may pass as `initiate_human_handoff.reason`
pub const HANDOFF_REASONS: [&str; 6] = [
    "تثبيت حجز تذكرة",
    "تثبيت عرض",
    "تثبيت عمرة",
    "تثبيت خدمة",
    "طلب مساعدة مباشرة",
    "استفسار عن سعر",
];

static DEFINITIONS: Lazy<Vec<ToolDefinition>> =
    Lazy::new(|| ToolKind::ALL.iter().map(|kind| definition(*kind)).collect());

/// All tool descriptors, in the order the model sees them
pub fn tool_definitions() -> &'static [ToolDefinition] {
    &DEFINITIONS
}

fn definition(kind: ToolKind) -> ToolDefinition {
    let name = kind.as_str();
    match kind {
        ToolKind::ListServices => ToolDefinition::without_parameters(
            name,
            "تستخدم *فقط* عندما يسأل المستخدم سؤالاً عاماً عن الخدمات المتوفرة، مثل 'ما هي خدماتكم؟' أو 'شو عندكم خدمات؟'.",
        ),
        ToolKind::FindService => ToolDefinition::new(
            name,
            "تستخدم للبحث عن خدمة *محددة* عندما يذكر المستخدم تفاصيل عنها. لا تستخدمها للأسئلة العامة عن الخدمات.",
            InputSchema::object()
                .property(
                    "query",
                    PropertySchema::string(
                        "نص البحث الذي يصف الخدمة المطلوبة. مثال: 'سيارة للإيجار' أو 'تجديد جواز السفر'",
                    ),
                    true,
                )
                .to_value(),
        ),
        ToolKind::ListOffers => ToolDefinition::without_parameters(
            name,
            "تستخدم *فقط* عندما يسأل المستخدم سؤالاً عاماً عن العروض، مثل 'ما هي عروضكم؟'.",
        ),
        ToolKind::ListUmrahPackages => ToolDefinition::without_parameters(
            name,
            "تستخدم *فقط* عندما يسأل المستخدم سؤالاً عاماً عن باقات العمرة.",
        ),
        ToolKind::GetAllCompanyInfo => {
            ToolDefinition::without_parameters(name, "للحصول على معلومات ثابتة عن الشركة.")
        }
        ToolKind::ListFlights => ToolDefinition::without_parameters(
            name,
            "تستخدم *فقط* عندما يسأل المستخدم سؤالاً عاماً عن رحلات الطيران المتوفرة دون تحديد وجهة أو تاريخ.",
        ),
        ToolKind::FindFlights => ToolDefinition::new(
            name,
            "تستخدم للبحث عن رحلات طيران *محددة*. لا تستخدم هذه الأداة إذا كان المستخدم يسأل سؤالاً عاماً عن 'تفاصيل السفر' أو 'إجراءات السفر' لدولة ما، بل استخدمها فقط عندما يكون الطلب واضحاً عن **تذكرة طيران**.",
            InputSchema::object()
                .property(
                    "destination",
                    PropertySchema::string("وجهة السفر (مدينة أو دولة)"),
                    true,
                )
                .property(
                    "origin",
                    PropertySchema::string("نقطة الانطلاق (مدينة أو دولة)"),
                    false,
                )
                .property(
                    "time_query",
                    PropertySchema::string(
                        "استعلام الوقت كما يعبر عنه المستخدم بالضبط (مثال: 'الأسبوع القادم'، 'بعد غد'، 'رحلات آخر الشهر'، 'يومي').",
                    ),
                    false,
                )
                .to_value(),
        ),
        ToolKind::InitiateVisaDiscovery => ToolDefinition::new(
            name,
            "تستخدم *فقط* عندما يسأل المستخدم سؤالاً عاماً جداً عن الفيزا **دون ذكر اسم أي دولة**، مثل 'ما هي أنواع الفيزا لديكم؟' أو 'ما هي الدول التي توفرون لها فيزا؟'. **لا تستخدمها إذا ذكر المستخدم اسم دولة معينة**.",
            InputSchema::object()
                .property(
                    "topic",
                    PropertySchema::enum_type(
                        "حدد 'countries' إذا سأل عن الدول، أو 'types' إذا سأل عن أنواع الفيزا.",
                        vec!["countries".into(), "types".into()],
                    ),
                    true,
                )
                .to_value(),
        ),
        ToolKind::FindVisaDetails => ToolDefinition::new(
            name,
            "للبحث عن تفاصيل الفيزا لدولة معينة.",
            InputSchema::object()
                .property("country", PropertySchema::string("اسم الدولة"), true)
                .to_value(),
        ),
        ToolKind::InitiateHumanHandoff => ToolDefinition::new(
            name,
            "تستخدم هذه الأداة *فقط* عندما يطلب المستخدم بوضوح التحدث إلى موظف أو عندما يستفسر عن أمور تتطلب تدخلاً بشرياً إلزامياً مثل تثبيت الحجوزات.",
            InputSchema::object()
                .property(
                    "reason",
                    PropertySchema::enum_type(
                        "سبب التحويل. يجب أن يكون واحداً من القيم التالية بناءً على طلب المستخدم.",
                        HANDOFF_REASONS.iter().map(|r| r.to_string()).collect(),
                    ),
                    true,
                )
                .property(
                    "details",
                    PropertySchema::string(
                        "تفاصيل إضافية حول الطلب. إذا كان الطلب هو تثبيت خدمة، يجب أن يحتوي هذا الحقل على اسم الخدمة. مثال: 'سيارة هيونداي توسان' أو 'رحلة إلى دبي'.",
                    ),
                    false,
                )
                .to_value(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_has_a_definition() {
        let defs = tool_definitions();
        assert_eq!(defs.len(), ToolKind::ALL.len());
        for kind in ToolKind::ALL {
            assert!(defs.iter().any(|d| d.name == kind.as_str()));
        }
    }

    #[test]
    fn test_list_tools_have_no_parameters() {
        let defs = tool_definitions();
        let list_offers = defs.iter().find(|d| d.name == "list_offers").unwrap();
        assert!(list_offers.parameters.is_none());

        let find_flights = defs.iter().find(|d| d.name == "find_flights").unwrap();
        let params = find_flights.parameters.as_ref().unwrap();
        assert_eq!(params["required"], serde_json::json!(["destination"]));
    }

    #[test]
    fn test_handoff_reason_enum() {
        let defs = tool_definitions();
        let handoff = defs
            .iter()
            .find(|d| d.name == "initiate_human_handoff")
            .unwrap();
        let reasons = &handoff.parameters.as_ref().unwrap()["properties"]["reason"]["enum"];
        assert_eq!(reasons.as_array().map(|a| a.len()), Some(HANDOFF_REASONS.len()));
    }
}
