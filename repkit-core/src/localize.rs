use crate::locale::CompatibilityClass;
use fluent_bundle::{FluentArgs, FluentBundle, FluentResource, FluentValue};
use unic_langid::LanguageIdentifier;

/// Fluent-based message catalog with built-in resources (see ../i18n).
pub struct Messages {
    bundle: FluentBundle<FluentResource>,
}

impl Messages {
    /// Create a catalog from the built-in `.ftl` strings. Unknown language
    /// tags fall back to English.
    pub fn builtin(lang: &str) -> Self {
        let langid: LanguageIdentifier = lang.parse().unwrap_or_else(|_| "en".parse().unwrap());

        let ftl_src = match lang {
            "ru" | "ru-RU" => include_str!("../i18n/ru.ftl"),
            _ => include_str!("../i18n/en.ftl"),
        };

        let res =
            FluentResource::try_new(ftl_src.to_owned()).expect("invalid built-in FTL resource");

        let mut bundle = FluentBundle::new(vec![langid]);
        bundle.set_use_isolating(false);
        bundle.add_resource(res).expect("failed to add FTL resource");
        Self { bundle }
    }

    /// Russian for the Cyrillic family, English otherwise.
    pub fn for_class(class: CompatibilityClass) -> Self {
        match class {
            CompatibilityClass::RussianFamily => Self::builtin("ru"),
            _ => Self::builtin("en"),
        }
    }

    /// Format a message by code with named args (("name","value"), ...).
    /// Returns the code itself if not found.
    pub fn msg(&self, code: &str, args: &[(&str, &str)]) -> String {
        let Some(msg) = self.bundle.get_message(code) else {
            return code.to_string();
        };
        let Some(pattern) = msg.value() else {
            return code.to_string();
        };

        let mut fa = FluentArgs::new();
        for (k, v) in args {
            fa.set(*k, FluentValue::from(*v));
        }

        let mut errs = vec![];
        let s = self.bundle.format_pattern(pattern, Some(&fa), &mut errs).to_string();

        if errs.is_empty() {
            s
        } else {
            code.to_string()
        }
    }
}
