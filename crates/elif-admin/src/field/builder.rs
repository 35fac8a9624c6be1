//! Fluent setters shared by every descriptor

use super::{DependencyRule, ElementContext, Field, TextAlign};
use crate::record::Record;
use elif_admin_validation::{RuleName, ValidationRule};
use serde_json::Value;
use std::sync::Arc;

/// Common fluent configuration
///
/// Every setter consumes the descriptor and returns it, so definitions read
/// as one chain. Setters never validate combinations: a length rule on a
/// number field is accepted as is.
pub trait FieldBuilder: Sized {
    /// The base descriptor
    fn field(&self) -> &Field;

    fn field_mut(&mut self) -> &mut Field;

    fn label(mut self, label: impl Into<String>) -> Self {
        self.field_mut().label = label.into();
        self
    }

    fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.field_mut().placeholder = placeholder.into();
        self
    }

    fn help_text(mut self, help_text: impl Into<String>) -> Self {
        self.field_mut().help_text = help_text.into();
        self
    }

    fn read_only(mut self) -> Self {
        self.field_mut().flags.read_only = true;
        self
    }

    fn disabled(mut self) -> Self {
        self.field_mut().flags.disabled = true;
        self
    }

    fn immutable(mut self) -> Self {
        self.field_mut().flags.immutable = true;
        self
    }

    /// Mark as required and attach the `required` rule once
    fn required(mut self) -> Self {
        let field = self.field_mut();
        field.flags.required = true;
        if !field.rules.iter().any(|rule| rule.name == RuleName::Required) {
            field.rules.insert(0, ValidationRule::required());
        }
        self
    }

    fn nullable(mut self) -> Self {
        self.field_mut().flags.nullable = true;
        self
    }

    fn filterable(mut self) -> Self {
        self.field_mut().flags.filterable = true;
        self
    }

    fn sortable(mut self) -> Self {
        self.field_mut().flags.sortable = true;
        self
    }

    fn searchable(mut self) -> Self {
        self.field_mut().flags.searchable = true;
        self
    }

    fn stacked(mut self) -> Self {
        self.field_mut().flags.stacked = true;
        self
    }

    fn text_align(mut self, align: TextAlign) -> Self {
        self.field_mut().text_align = align;
        self
    }

    /// Free-form frontend property
    fn prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.field_mut().props.insert(key.into(), value.into());
        self
    }

    fn context(mut self, context: ElementContext) -> Self {
        self.field_mut().context = Some(context);
        self
    }

    fn hide_on_list(self) -> Self {
        self.context(ElementContext::HideOnList)
    }

    fn hide_on_detail(self) -> Self {
        self.context(ElementContext::HideOnDetail)
    }

    fn hide_on_create(self) -> Self {
        self.context(ElementContext::HideOnCreate)
    }

    fn hide_on_update(self) -> Self {
        self.context(ElementContext::HideOnUpdate)
    }

    fn hide_on_form(self) -> Self {
        self.context(ElementContext::HideOnForm)
    }

    fn only_on_list(self) -> Self {
        self.context(ElementContext::OnlyOnList)
    }

    fn only_on_detail(self) -> Self {
        self.context(ElementContext::OnlyOnDetail)
    }

    fn only_on_create(self) -> Self {
        self.context(ElementContext::OnlyOnCreate)
    }

    fn only_on_update(self) -> Self {
        self.context(ElementContext::OnlyOnUpdate)
    }

    fn only_on_form(self) -> Self {
        self.context(ElementContext::OnlyOnForm)
    }

    /// Record-level visibility predicate
    fn show_when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&dyn Record) -> bool + Send + Sync + 'static,
    {
        self.field_mut().visible_when = Some(Arc::new(predicate));
        self
    }

    fn rule(mut self, rule: ValidationRule) -> Self {
        self.field_mut().rules.push(rule);
        self
    }

    fn with_rules<I>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = ValidationRule>,
    {
        self.field_mut().rules.extend(rules);
        self
    }

    fn validate_email(self) -> Self {
        self.rule(ValidationRule::email())
    }

    fn validate_url(self) -> Self {
        self.rule(ValidationRule::url())
    }

    fn min(self, bound: f64) -> Self {
        self.rule(ValidationRule::min(bound))
    }

    fn max(self, bound: f64) -> Self {
        self.rule(ValidationRule::max(bound))
    }

    fn min_length(self, length: usize) -> Self {
        self.rule(ValidationRule::min_length(length))
    }

    fn max_length(self, length: usize) -> Self {
        self.rule(ValidationRule::max_length(length))
    }

    fn pattern(self, regex: impl Into<String>) -> Self {
        self.rule(ValidationRule::pattern(regex))
    }

    fn unique(self, table: impl Into<String>, column: impl Into<String>) -> Self {
        self.rule(ValidationRule::unique(table, column))
    }

    fn exists(self, table: impl Into<String>, column: impl Into<String>) -> Self {
        self.rule(ValidationRule::exists(table, column))
    }

    /// Transform applied by [`Field::display_value`]
    fn display_using<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.field_mut().display = Some(Arc::new(callback));
        self
    }

    fn depends_on(mut self, rule: DependencyRule) -> Self {
        self.field_mut().dependencies.push(rule);
        self
    }

    /// Mark as a column of a many-to-many pivot row
    fn pivot(mut self) -> Self {
        self.field_mut().extensions.pivot = true;
        self
    }
}

impl FieldBuilder for Field {
    fn field(&self) -> &Field {
        self
    }

    fn field_mut(&mut self) -> &mut Field {
        self
    }
}
