//! Fixed message templates per event kind.
//!
//! Each kind maps to one subject and one body template rendered with
//! `minijinja` against the event's subject snapshot and the recipient's
//! name. The copy mirrors the platform's mail notifications.

use super::{EventKind, NotificationEvent, ProjectSummary, TaskSummary};
use minijinja::Environment;
use serde::Serialize;
use thiserror::Error;

/// Rendered notification message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Event kind the notice was rendered for.
    pub kind: EventKind,
    /// Rendered subject line.
    pub subject_line: String,
    /// Rendered body.
    pub body: String,
}

/// Error returned when a template fails to render.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("template for {kind:?} failed to render: {reason}")]
pub struct TemplateError {
    /// Event kind whose template failed.
    pub kind: EventKind,
    /// Renderer-reported reason.
    pub reason: String,
}

#[derive(Serialize)]
struct TemplateContext<'a> {
    recipient_name: &'a str,
    task: Option<&'a TaskSummary>,
    project: Option<&'a ProjectSummary>,
    invitation_url: Option<&'a str>,
}

const TASK_ASSIGNED_SUBJECT: &str = "Nouvelle tâche assignée : {{ task.title }}";
const TASK_ASSIGNED_BODY: &str = "\
Bonjour {{ recipient_name }},
La tâche \"{{ task.title }}\" vous a été assignée.
{%- if task.project_name %}
Projet : {{ task.project_name }}
{%- endif %}
Priorité : {{ task.priority_label }}
Statut : {{ task.status_label }}
{%- if task.due_date %}
Échéance : {{ task.due_date }}
{%- endif %}";

const TASK_DUE_SOON_SUBJECT: &str = "⏰ Échéance proche : {{ task.title }}";
const TASK_DUE_SOON_BODY: &str = "\
Bonjour {{ recipient_name }},
La tâche \"{{ task.title }}\" arrive à échéance.
{%- if task.due_date %}
Date limite : {{ task.due_date }}
{%- endif %}
{%- if task.project_name %}
Projet : {{ task.project_name }}
{%- endif %}
Statut : {{ task.status_label }}";

const PROJECT_AT_RISK_SUBJECT: &str = "⚠️ Projet à risque : {{ project.name }}";
const PROJECT_AT_RISK_BODY: &str = "\
Bonjour {{ recipient_name }},
Le projet \"{{ project.name }}\" nécessite votre attention.
Score de risque : {{ project.risk_score }}/100
Statut : {{ project.status_label }}
Progression : {{ project.progress }}%
{%- if project.end_date %}
Date de fin prévue : {{ project.end_date }}
{%- endif %}
Prenez les mesures nécessaires pour réduire les risques.";

const PROJECT_USER_ADDED_SUBJECT: &str = "Vous avez été ajouté au projet {{ project.name }}";
const PROJECT_USER_ADDED_BODY: &str = "\
Bonjour {{ recipient_name }},
Vous avez été ajouté au projet \"{{ project.name }}\".
Description : {% if project.description %}{{ project.description }}{% else %}Aucune description{% endif %}
Statut : {{ project.status_label }}";

const USER_INVITED_SUBJECT: &str = "Invitation à rejoindre la plateforme";
const USER_INVITED_BODY: &str = "\
Bonjour {{ recipient_name }},
{%- if project %}
Vous avez été ajouté au projet \"{{ project.name }}\".
{%- else %}
Vous avez été invité à rejoindre la plateforme.
{%- endif %}
Lien : {{ invitation_url }}
Si vous n'attendiez pas ce message, vous pouvez l'ignorer.";

const fn templates_for(kind: EventKind) -> (&'static str, &'static str) {
    match kind {
        EventKind::TaskAssigned => (TASK_ASSIGNED_SUBJECT, TASK_ASSIGNED_BODY),
        EventKind::TaskDueSoon => (TASK_DUE_SOON_SUBJECT, TASK_DUE_SOON_BODY),
        EventKind::ProjectAtRisk => (PROJECT_AT_RISK_SUBJECT, PROJECT_AT_RISK_BODY),
        EventKind::ProjectUserAdded => (PROJECT_USER_ADDED_SUBJECT, PROJECT_USER_ADDED_BODY),
        EventKind::UserInvited => (USER_INVITED_SUBJECT, USER_INVITED_BODY),
    }
}

fn context_for<'a>(event: &'a NotificationEvent, recipient_name: &'a str) -> TemplateContext<'a> {
    match event {
        NotificationEvent::TaskAssigned { task } | NotificationEvent::TaskDueSoon { task } => {
            TemplateContext {
                recipient_name,
                task: Some(task),
                project: None,
                invitation_url: None,
            }
        }
        NotificationEvent::ProjectAtRisk { project }
        | NotificationEvent::ProjectUserAdded { project } => TemplateContext {
            recipient_name,
            task: None,
            project: Some(project),
            invitation_url: None,
        },
        NotificationEvent::UserInvited {
            invitation_url,
            project,
        } => TemplateContext {
            recipient_name,
            task: None,
            project: project.as_ref(),
            invitation_url: Some(invitation_url),
        },
    }
}

/// Renders the fixed subject and body templates for an event, personalised
/// with the recipient's name.
///
/// # Errors
///
/// Returns [`TemplateError`] when rendering fails.
pub fn render_notice(
    event: &NotificationEvent,
    recipient_name: &str,
) -> Result<Notice, TemplateError> {
    let kind = event.kind();
    let (subject_template, body_template) = templates_for(kind);
    let context = context_for(event, recipient_name);
    let environment = Environment::new();
    let render = |template: &str, ctx: &TemplateContext<'_>| {
        environment
            .render_str(template, ctx)
            .map_err(|error| TemplateError {
                kind,
                reason: error.to_string(),
            })
    };
    let subject_line = render(subject_template, &context)?;
    let body = render(body_template, &context)?;
    Ok(Notice {
        kind,
        subject_line,
        body,
    })
}
