use std::sync::Arc;

use anyhow::Context;
use siasis_templates_contracts::{
    RenderedTemplate, Template, TemplateService, BASE_TEMPLATE, TEMPLATES,
};
use tera::Tera;
use tracing::trace;

#[derive(Debug, Clone)]
pub struct TemplateServiceImpl {
    tera: Arc<Tera>,
}

impl TemplateServiceImpl {
    pub fn new() -> anyhow::Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_template("base.html", BASE_TEMPLATE)
            .context("Failed to load base template")?;

        for &(name, html, text) in TEMPLATES {
            tera.add_raw_templates([
                (format!("{name}.html"), html),
                (format!("{name}.txt"), text),
            ])
            .with_context(|| format!("Failed to load template {name}"))?;
        }

        Ok(Self { tera: tera.into() })
    }
}

impl TemplateService for TemplateServiceImpl {
    fn render<T: Template + 'static>(&self, template: &T) -> anyhow::Result<RenderedTemplate> {
        trace!(template = T::NAME, "Rendering template");
        let context = tera::Context::from_serialize(template)?;
        let render = |extension: &str| {
            self.tera
                .render(&format!("{}.{extension}", T::NAME), &context)
                .with_context(|| format!("Failed to render template {}.{extension}", T::NAME))
        };

        Ok(RenderedTemplate {
            html: render("html")?,
            text: render("txt")?.trim().to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use siasis_templates_contracts::LeadNotificationTemplate;

    use super::*;

    fn lead() -> LeadNotificationTemplate {
        LeadNotificationTemplate {
            full_name: "María Quispe".into(),
            role_title: "Directora".into(),
            email: "maria@example.com".into(),
            phone: "961863783".into(),
            institution: "I.E. <20935> & Asunción".into(),
            message: "Queremos implementar SIASIS.".into(),
            requested_at: "19 de octubre de 2026, 09:05".into(),
        }
    }

    #[test]
    fn lead_notification() {
        // Arrange
        let sut = TemplateServiceImpl::new().unwrap();

        // Act
        let result = sut.render(&lead()).unwrap();

        // Assert
        assert!(result.html.contains("Nueva Solicitud de Implementación"));
        assert!(result.html.contains("María Quispe"));
        assert!(result.html.contains("I.E. &lt;20935&gt; &amp; Asunción"));
        assert!(result.html.contains("Sistema Integral de Asistencia"));
        assert!(!result.html.contains("<20935>"));

        assert!(result.text.starts_with("Nueva Solicitud de Implementación SIASIS"));
        assert!(result.text.contains("Fecha: 19 de octubre de 2026, 09:05"));
        assert!(result.text.contains("- Cargo: Directora"));
        assert!(result.text.contains("I.E. <20935> & Asunción"));
        assert!(result.text.ends_with("sitio web de SIASIS."));
    }
}
