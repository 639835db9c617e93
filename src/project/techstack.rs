//! Technology-stack inference from extensions and dependency names.
//!
//! Both rule tables are ordered; output order follows table order, never
//! input order, so two scans of the same project always report the same
//! stack. Detection is by exact dependency name, not substring, so `react`
//! does not fire on `preact`.

use std::collections::BTreeMap;

use super::dependencies::DependencyInfo;

/// Extension-driven language rules, in report order.
const LANGUAGE_RULES: &[(&str, &str)] = &[
    ("js", "JavaScript"),
    ("mjs", "JavaScript"),
    ("cjs", "JavaScript"),
    ("jsx", "React"),
    ("ts", "TypeScript"),
    ("tsx", "React"),
    ("py", "Python"),
    ("rs", "Rust"),
    ("go", "Go"),
    ("java", "Java"),
    ("rb", "Ruby"),
    ("php", "PHP"),
    ("vue", "Vue.js"),
    ("svelte", "Svelte"),
];

/// Dependency-driven framework and tooling rules, in report order.
const FRAMEWORK_RULES: &[(&str, &str)] = &[
    ("react", "React"),
    ("react-dom", "React"),
    ("next", "Next.js"),
    ("vue", "Vue.js"),
    ("nuxt", "Nuxt"),
    ("@angular/core", "Angular"),
    ("svelte", "Svelte"),
    ("express", "Express"),
    ("fastify", "Fastify"),
    ("koa", "Koa"),
    ("@nestjs/core", "NestJS"),
    ("electron", "Electron"),
    ("typescript", "TypeScript"),
    ("webpack", "Webpack"),
    ("vite", "Vite"),
    ("rollup", "Rollup"),
    ("esbuild", "esbuild"),
    ("jest", "Jest"),
    ("mocha", "Mocha"),
    ("vitest", "Vitest"),
    ("cypress", "Cypress"),
    ("eslint", "ESLint"),
    ("prettier", "Prettier"),
    ("tailwindcss", "Tailwind CSS"),
    ("flask", "Flask"),
    ("django", "Django"),
    ("fastapi", "FastAPI"),
    ("pytest", "pytest"),
    ("numpy", "NumPy"),
    ("pandas", "pandas"),
];

/// Infer the technology stack from extension counts and dependencies.
pub fn infer(by_extension: &BTreeMap<String, usize>, deps: &DependencyInfo) -> Vec<String> {
    let mut stack: Vec<String> = Vec::new();

    for (extension, label) in LANGUAGE_RULES {
        if by_extension.contains_key(*extension) && !stack.iter().any(|s| s == label) {
            stack.push((*label).to_string());
        }
    }

    for (dependency, label) in FRAMEWORK_RULES {
        let present = deps.all_names().any(|name| name == *dependency);
        if present && !stack.iter().any(|s| s == label) {
            stack.push((*label).to_string());
        }
    }

    stack
}
