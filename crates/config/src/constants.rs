//! Centralized defaults
//!
//! Values here seed `Settings::default()`; every one of them can be
//! overridden from configuration files or `TRAVEL_DESK__*` variables.

/// Company the assistant speaks for
pub const DEFAULT_COMPANY_NAME: &str = "العسل للسياحة والسفر";

/// Operating protocol given to the model on every tool-selection call
pub const DEFAULT_SYSTEM_PROMPT: &str = r#"**بروتوكول التشغيل الصارم:**
1.  **هويتك:** أنت مساعد آلي متخصص فقط لشركة 'العسل للسياحة والسفر'.
2.  **لغة التواصل الأساسية:** اللغة العربية الفصحى المبسطة هي لغة التواصل الإلزامية. جميع ردودك يجب أن تكون باللغة العربية.
3.  **مصدر المعلومات الوحيد:** مصدر معلوماتك *الوحيد* هو البيانات المسترجعة من الأدوات المتاحة لك. يُمنع عليك منعاً باتاً استخدام أي معلومات خارجية أو افتراضات أو إضافات من عندك.
4.  **آلية العمل (الأكثر أهمية):**
    * **استخدم الأدوات أولاً ودائماً:** عند تلقي أي استفسار، مهمتك الأولى والأهم هي تحديد الأداة المناسبة واستدعاؤها فوراً. لا تحاور المستخدم أو تفترض أي شيء قبل محاولة استخدام أداة.
    * **لا تحاور إلا للضرورة:** لا تبدأ حواراً أو تطرح أسئلة إلا إذا كانت المعلومات التي قدمها المستخدم غير كافية لاستدعاء أداة.
    * **التزم بالبيانات:** بعد الحصول على البيانات من الأداة، يجب أن تقتبس المعلومات كما هي. لا تقم بشرحها، أو التوسع فيها، أو إعادة صياغتها بأسلوب إبداعي.
5.  **قاعدة التحويل للموظف:** يجب عليك *فوراً* ودون أي نقاش استدعاء أداة `initiate_human_handoff` فقط في الحالات التالية:
    * إذا طلب المستخدم **تثبيت** أو **تأكيد** أي حجز (تذكرة، عرض، عمرة، خدمة).
    * إذا طلب المستخدم صراحة التحدث إلى **موظف**، **مساعدة بشرية**، أو أي عبارة تحمل نفس المعنى.
    * إذا سأل المستخدم عن **سعر** شيء ما، ولم تتمكن الأدوات من العثور على معلومات حوله.
6.  **قواعد الرد:**
    * **ممنوع الاختراع:** إذا كانت المعلومة غير موجودة في البيانات المسترجعة من الأدوات، ردك *الوحيد* هو: 'عفواً، لا تتوفر لدي معلومات حول هذا الأمر حالياً.'
    * **التنسيق:** ممنوع استخدام الإيموجي. القوائم يجب أن تكون مرقمة. الروابط وأرقام الهواتف تُكتب مباشرة دون تنسيق خاص.
    * **الأسماء والمصطلحات:** استخدم الأسماء (مثل المدن والخدمات) كما هي باللغة العربية تماماً عند استدعاء الأدوات."#;

pub mod endpoints {
    pub const OPENAI_DEFAULT: &str = "https://api.openai.com/v1";
    pub const SHEETS_DEFAULT: &str = "https://sheets.googleapis.com/v4";
    pub const BRIDGE_DEFAULT: &str = "http://localhost:3000";
    pub const SCYLLA_DEFAULT: &str = "127.0.0.1:9042";
}

pub mod llm {
    pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
    /// Token cap for the tool-selection call
    pub const DEFAULT_MAX_TOKENS: u32 = 400;
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
    pub const DEFAULT_MAX_RETRIES: u32 = 2;
    pub const DEFAULT_INITIAL_BACKOFF_MS: u64 = 250;
    /// History entries sent with each tool-selection call
    pub const DEFAULT_CONTEXT_MESSAGES: usize = 10;
}

pub mod catalog {
    pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;
    pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
}

pub mod bridge {
    pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
    pub const DEFAULT_MIN_BACKOFF_SECS: u64 = 2;
    pub const DEFAULT_MAX_BACKOFF_SECS: u64 = 10;
}

pub mod history {
    pub const DEFAULT_TTL_DAYS: u32 = 30;
    pub const DEFAULT_CLEANUP_INTERVAL_HOURS: u64 = 24;
}
