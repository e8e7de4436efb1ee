//! Deterministic expansion of a technical spec into tickets.
//!
//! Order is fixed: setup, models, views, controllers, routes, features,
//! tests, deployment. Ids are `T1`, `T2`, ... in that order. Dependencies
//! are declared but nothing schedules by them.

use autocoder_common::{Priority, TechnicalSpec, Ticket, TicketKind, ticket_id};

#[derive(Debug, Default, Clone, Copy)]
pub struct TicketPlanner;

impl TicketPlanner {
    pub fn new() -> Self {
        Self
    }

    pub fn plan(&self, spec: &TechnicalSpec) -> Vec<Ticket> {
        let mut plan = PlanBuilder::default();

        plan.push(
            "Project Setup and Structure",
            "Create initial project structure with directories for models, views, controllers",
            TicketKind::Migration,
            Priority::High,
            5,
            Vec::new(),
        );

        for model in &spec.models {
            plan.push(
                format!("Create {} Model", model.name),
                format!(
                    "Implement {} with attributes: {}",
                    model.name,
                    model.attribute_names().join(", ")
                ),
                TicketKind::Model,
                Priority::High,
                10,
                vec![ticket_id(1)],
            );
        }

        // Model tickets sit at T2..T(1+models) by position.
        let model_ids: Vec<String> = (0..spec.models.len()).map(|i| ticket_id(2 + i)).collect();
        for view in &spec.views {
            plan.push(
                format!("Create {} View", view.name),
                format!(
                    "Implement view at {} with components: {}",
                    view.path,
                    view.components.join(", ")
                ),
                TicketKind::View,
                Priority::Medium,
                15,
                model_ids.clone(),
            );
        }

        for controller in &spec.controllers {
            plan.push(
                format!("Create {}", controller.name),
                format!(
                    "Implement controller with actions: {}",
                    controller.actions.join(", ")
                ),
                TicketKind::Controller,
                Priority::Medium,
                20,
                Vec::new(),
            );
        }

        plan.push(
            "Configure Routes",
            "Set up client-side routing for all paths",
            TicketKind::Route,
            Priority::Medium,
            10,
            Vec::new(),
        );

        for feature in &spec.features {
            plan.push(
                format!("Implement {}", feature.name),
                feature.description.clone(),
                TicketKind::Controller,
                Priority::Medium,
                30,
                Vec::new(),
            );
        }

        plan.push(
            "Create Test Suite",
            "Write unit and integration tests",
            TicketKind::Test,
            Priority::Low,
            20,
            Vec::new(),
        );

        plan.push(
            "Configure Deployment",
            "Set up Cloudflare deployment configuration",
            TicketKind::Deployment,
            Priority::Low,
            5,
            Vec::new(),
        );

        plan.tickets
    }

    /// Number of tickets `plan` produces for `spec`.
    #[cfg(test)]
    fn expected_count(spec: &TechnicalSpec) -> usize {
        4 + spec.models.len() + spec.views.len() + spec.controllers.len() + spec.features.len()
    }
}

/// Sum of per-ticket estimates, in minutes.
pub fn total_estimated_minutes(tickets: &[Ticket]) -> u32 {
    tickets.iter().map(|t| t.estimated_time).sum()
}

#[derive(Default)]
struct PlanBuilder {
    tickets: Vec<Ticket>,
}

impl PlanBuilder {
    fn push(
        &mut self,
        title: impl Into<String>,
        description: impl Into<String>,
        kind: TicketKind,
        priority: Priority,
        estimated_time: u32,
        dependencies: Vec<String>,
    ) {
        let id = ticket_id(self.tickets.len() + 1);
        self.tickets.push(Ticket::new(
            id,
            title,
            description,
            kind,
            priority,
            estimated_time,
            dependencies,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autocoder_common::{Controller, Feature, Model, TicketStatus, View};

    fn model(name: &str, attrs: &[&str]) -> Model {
        Model {
            name: name.to_string(),
            attributes: attrs
                .iter()
                .map(|a| (a.to_string(), "string".to_string()))
                .collect(),
            relationships: Vec::new(),
            validations: Vec::new(),
        }
    }

    fn feature(name: &str) -> Feature {
        Feature {
            name: name.to_string(),
            description: format!("{} for everyone", name),
            user_stories: Vec::new(),
            acceptance_criteria: Vec::new(),
        }
    }

    fn todo_spec() -> TechnicalSpec {
        TechnicalSpec {
            models: vec![model("Todo", &["title", "done"]), model("Category", &["name"])],
            views: vec![View {
                name: "TodoList".to_string(),
                path: "/todos".to_string(),
                components: vec!["TodoItem".to_string(), "CategoryFilter".to_string()],
                data_requirements: Vec::new(),
            }],
            controllers: vec![Controller {
                name: "TodoController".to_string(),
                actions: vec!["index".to_string(), "create".to_string()],
                before_filters: Vec::new(),
            }],
            features: vec![feature("Drag and drop")],
            ..TechnicalSpec::default()
        }
    }

    #[test]
    fn test_plan_order_and_kinds() {
        let tickets = TicketPlanner::new().plan(&todo_spec());
        let kinds: Vec<TicketKind> = tickets.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TicketKind::Migration,
                TicketKind::Model,
                TicketKind::Model,
                TicketKind::View,
                TicketKind::Controller,
                TicketKind::Route,
                TicketKind::Controller,
                TicketKind::Test,
                TicketKind::Deployment,
            ]
        );
    }

    #[test]
    fn test_ids_are_dense() {
        let tickets = TicketPlanner::new().plan(&todo_spec());
        for (i, ticket) in tickets.iter().enumerate() {
            assert_eq!(ticket.id, format!("T{}", i + 1));
            assert_eq!(ticket.status, TicketStatus::Pending);
        }
    }

    #[test]
    fn test_titles_descriptions_and_estimates() {
        let tickets = TicketPlanner::new().plan(&todo_spec());
        assert_eq!(tickets[0].title, "Project Setup and Structure");
        assert_eq!(tickets[1].title, "Create Todo Model");
        assert_eq!(tickets[1].description, "Implement Todo with attributes: title, done");
        assert_eq!(tickets[3].title, "Create TodoList View");
        assert_eq!(
            tickets[3].description,
            "Implement view at /todos with components: TodoItem, CategoryFilter"
        );
        assert_eq!(tickets[4].title, "Create TodoController");
        assert_eq!(tickets[5].title, "Configure Routes");
        assert_eq!(tickets[6].title, "Implement Drag and drop");
        assert_eq!(tickets[6].description, "Drag and drop for everyone");
        assert_eq!(tickets[7].title, "Create Test Suite");
        assert_eq!(tickets[8].title, "Configure Deployment");

        let estimates: Vec<u32> = tickets.iter().map(|t| t.estimated_time).collect();
        assert_eq!(estimates, vec![5, 10, 10, 15, 20, 10, 30, 20, 5]);
        assert_eq!(total_estimated_minutes(&tickets), 125);

        assert_eq!(tickets[0].priority, Priority::High);
        assert_eq!(tickets[1].priority, Priority::High);
        assert_eq!(tickets[3].priority, Priority::Medium);
        assert_eq!(tickets[8].priority, Priority::Low);
    }

    #[test]
    fn test_dependencies_follow_positional_ids() {
        let tickets = TicketPlanner::new().plan(&todo_spec());
        assert!(tickets[0].dependencies.is_empty());
        assert_eq!(tickets[1].dependencies, vec!["T1"]);
        assert_eq!(tickets[2].dependencies, vec!["T1"]);
        assert_eq!(tickets[3].dependencies, vec!["T2", "T3"]);
        for ticket in &tickets[4..] {
            assert!(ticket.dependencies.is_empty(), "{} has dependencies", ticket.id);
        }
    }

    #[test]
    fn test_views_without_models_have_no_dependencies() {
        let spec = TechnicalSpec {
            views: vec![View {
                name: "MainView".to_string(),
                path: "/".to_string(),
                components: Vec::new(),
                data_requirements: Vec::new(),
            }],
            ..TechnicalSpec::default()
        };
        let tickets = TicketPlanner::new().plan(&spec);
        assert_eq!(tickets[1].kind, TicketKind::View);
        assert!(tickets[1].dependencies.is_empty());
    }

    #[test]
    fn test_plan_is_pure() {
        let spec = todo_spec();
        let planner = TicketPlanner::new();
        assert_eq!(planner.plan(&spec), planner.plan(&spec));
    }

    #[test]
    fn test_count_formula() {
        let spec = todo_spec();
        let tickets = TicketPlanner::new().plan(&spec);
        assert_eq!(tickets.len(), TicketPlanner::expected_count(&spec));
        assert_eq!(tickets.len(), 1 + 2 + 1 + 1 + 1 + 1 + 1 + 1);
    }

    #[test]
    fn test_single_feature_spec_yields_five_tickets() {
        let spec = TechnicalSpec {
            features: vec![feature("Offline mode")],
            ..TechnicalSpec::default()
        };
        let tickets = TicketPlanner::new().plan(&spec);
        let summary: Vec<(&str, TicketKind)> =
            tickets.iter().map(|t| (t.id.as_str(), t.kind)).collect();
        assert_eq!(
            summary,
            vec![
                ("T1", TicketKind::Migration),
                ("T2", TicketKind::Route),
                ("T3", TicketKind::Controller),
                ("T4", TicketKind::Test),
                ("T5", TicketKind::Deployment),
            ]
        );
    }
}
