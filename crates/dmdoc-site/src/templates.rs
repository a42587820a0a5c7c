//! Embedded page templates.

use minijinja::Environment;

const TEMPLATES: &[(&str, &str)] = &[
    ("macros.html", include_str!("../templates/macros.html")),
    ("base.html", include_str!("../templates/base.html")),
    ("index.html", include_str!("../templates/index.html")),
    ("all-elements.html", include_str!("../templates/all-elements.html")),
    ("hierarchy.html", include_str!("../templates/hierarchy.html")),
    ("namespace.html", include_str!("../templates/namespace.html")),
    ("element.html", include_str!("../templates/element.html")),
];

/// Stylesheet copied to the output root.
pub(crate) const STYLESHEET_CONTENT: &str = include_str!("../assets/dmdoc.css");

/// Build the template environment.
///
/// Template names end in `.html`, so minijinja's default callback enables
/// HTML auto-escaping for all of them.
pub(crate) fn environment() -> Result<Environment<'static>, minijinja::Error> {
    let mut env = Environment::new();
    for &(name, source) in TEMPLATES {
        env.add_template(name, source)?;
    }
    Ok(env)
}
