/// WASM-compatible diagnostic types.
///
/// This module provides JavaScript-compatible wrappers for engine diagnostics.

use double_locus::{Diagnostic as RustDiagnostic, Severity as RustSeverity};
use wasm_bindgen::prelude::*;

/// Diagnostic severity for JavaScript.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Info,
}

impl From<RustSeverity> for Severity {
    fn from(severity: RustSeverity) -> Self {
        match severity {
            RustSeverity::Warning => Severity::Warning,
            RustSeverity::Info => Severity::Info,
        }
    }
}

/// A diagnostic message for JavaScript.
///
/// # Examples
/// ```no_run
/// // In JavaScript:
/// // const diag = loops.diagnostics().get(0);
/// // console.log(diag.kind(), diag.message());
/// ```
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct Diagnostic {
    severity: Severity,
    kind: String,
    message: String,
}

#[wasm_bindgen]
impl Diagnostic {
    /// Returns the severity of the diagnostic.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Returns the diagnostic kind name, e.g. `"UnmatchedEndpoint"`.
    pub fn kind(&self) -> String {
        self.kind.clone()
    }

    /// Returns the diagnostic message.
    pub fn message(&self) -> String {
        self.message.clone()
    }

    /// Converts this diagnostic to a plain JavaScript object.
    ///
    /// This is useful for passing data between the worker and main thread,
    /// as wasm-bindgen wrappers cannot be transferred.
    pub fn to_js_object(&self) -> Result<JsValue, JsValue> {
        use js_sys::{Object, Reflect};

        let obj = Object::new();
        Reflect::set(&obj, &JsValue::from_str("severity"), &JsValue::from(self.severity as i32))?;
        Reflect::set(&obj, &JsValue::from_str("kind"), &JsValue::from_str(&self.kind))?;
        Reflect::set(&obj, &JsValue::from_str("message"), &JsValue::from_str(&self.message))?;
        Ok(JsValue::from(obj))
    }
}

impl From<&RustDiagnostic> for Diagnostic {
    fn from(diag: &RustDiagnostic) -> Self {
        Self {
            severity: diag.severity.into(),
            kind: kind_name(&diag.kind),
            message: diag.message.clone(),
        }
    }
}

/// Variant name of the engine diagnostic, as serialized.
fn kind_name(kind: &double_locus::DiagnosticKind) -> String {
    match serde_json::to_value(kind) {
        Ok(serde_json::Value::Object(map)) => map.keys().next().cloned().unwrap_or_default(),
        Ok(serde_json::Value::String(name)) => name,
        _ => String::new(),
    }
}

/// A collection of diagnostics.
#[wasm_bindgen]
#[derive(Debug, Clone, Default)]
pub struct DiagnosticList {
    diagnostics: Vec<Diagnostic>,
}

#[wasm_bindgen]
impl DiagnosticList {
    /// Returns the number of diagnostics.
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Returns true if there are no diagnostics.
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Returns a diagnostic by index.
    pub fn get(&self, index: usize) -> Option<Diagnostic> {
        self.diagnostics.get(index).cloned()
    }
}

impl DiagnosticList {
    pub fn new(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }
}

impl From<&double_locus::Diagnostics> for DiagnosticList {
    fn from(diagnostics: &double_locus::Diagnostics) -> Self {
        Self::new(diagnostics.iter().map(Diagnostic::from).collect())
    }
}
