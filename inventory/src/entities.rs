//! Inventory schema: sea-orm entities with their graph descriptors.
//!
//! Foreign keys are named after the edge that owns them, e.g. the key from a
//! file to its check list item is `check_list_item_files`.

fn not_empty(value: &sea_orm::Value) -> Result<(), String> {
    match value {
        sea_orm::Value::String(Some(s)) if s.is_empty() => {
            Err("value is less than the required length".to_string())
        }
        _ => Ok(()),
    }
}

pub mod work_order_type {
    use entgraph::{Edge, EdgeSpec, GraphEntity};
    use sea_orm::entity::prelude::*;
    use sea_orm::Value;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "work_order_types")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub create_time: DateTimeUtc,
        pub update_time: DateTimeUtc,
        #[sea_orm(unique)]
        pub name: String,
        #[sea_orm(nullable)]
        pub description: Option<String>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::work_order::Entity")]
        WorkOrders,
    }

    impl Related<super::work_order::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::WorkOrders.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}

    impl GraphEntity for Entity {
        const LABEL: &'static str = "work_order_type";
        type Id = i32;

        fn id_column() -> Column {
            Column::Id
        }

        fn id_of(model: &Model) -> i32 {
            model.id
        }

        fn create_time_column() -> Option<Column> {
            Some(Column::CreateTime)
        }

        fn update_time_column() -> Option<Column> {
            Some(Column::UpdateTime)
        }

        fn required_columns() -> Vec<Column> {
            vec![Column::Name]
        }

        fn validate(column: Column, value: &Value) -> Result<(), String> {
            match column {
                Column::Name => super::not_empty(value),
                _ => Ok(()),
            }
        }
    }

    /// Work orders of this type.
    pub struct WorkOrders;

    impl Edge for WorkOrders {
        type From = Entity;
        type To = super::work_order::Entity;
        const SPEC: EdgeSpec = EdgeSpec::o2m("work_orders", "work_orders", "work_order_type");

        fn target_fk(to: &super::work_order::Model) -> Option<i32> {
            to.work_order_type
        }
    }
}

pub mod work_order {
    use entgraph::{Edge, EdgeSpec, GraphEntity};
    use sea_orm::entity::prelude::*;
    use sea_orm::{Set, Value};

    pub const STATUS_PLANNED: &str = "PLANNED";
    pub const STATUS_PENDING: &str = "PENDING";
    pub const STATUS_DONE: &str = "DONE";
    pub const PRIORITY_NONE: &str = "NONE";

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "work_orders")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub create_time: DateTimeUtc,
        pub update_time: DateTimeUtc,
        pub name: String,
        pub status: String,
        pub priority: String,
        #[sea_orm(nullable)]
        pub description: Option<String>,
        pub owner_name: String,
        #[sea_orm(nullable)]
        pub install_date: Option<DateTimeUtc>,
        pub creation_date: DateTimeUtc,
        #[sea_orm(nullable)]
        pub assignee: Option<String>,
        #[sea_orm(nullable)]
        pub index: Option<i32>,
        #[sea_orm(nullable)]
        pub close_date: Option<DateTimeUtc>,
        #[sea_orm(nullable)]
        pub work_order_type: Option<i32>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::work_order_type::Entity",
            from = "Column::WorkOrderType",
            to = "super::work_order_type::Column::Id",
            on_update = "NoAction",
            on_delete = "SetNull"
        )]
        Type,
        #[sea_orm(has_many = "super::check_list_category::Entity")]
        CheckListCategories,
    }

    impl Related<super::work_order_type::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Type.def()
        }
    }

    impl Related<super::check_list_category::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::CheckListCategories.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}

    impl GraphEntity for Entity {
        const LABEL: &'static str = "work_order";
        type Id = i32;

        fn id_column() -> Column {
            Column::Id
        }

        fn id_of(model: &Model) -> i32 {
            model.id
        }

        fn create_time_column() -> Option<Column> {
            Some(Column::CreateTime)
        }

        fn update_time_column() -> Option<Column> {
            Some(Column::UpdateTime)
        }

        fn required_columns() -> Vec<Column> {
            vec![Column::Name, Column::OwnerName, Column::CreationDate]
        }

        fn apply_defaults(model: &mut ActiveModel) {
            if model.status.is_not_set() {
                model.status = Set(STATUS_PLANNED.to_string());
            }
            if model.priority.is_not_set() {
                model.priority = Set(PRIORITY_NONE.to_string());
            }
        }

        fn validate(column: Column, value: &Value) -> Result<(), String> {
            match column {
                Column::Name => super::not_empty(value),
                _ => Ok(()),
            }
        }
    }

    pub struct Type;

    impl Edge for Type {
        type From = Entity;
        type To = super::work_order_type::Entity;
        const SPEC: EdgeSpec = EdgeSpec::m2o("type", "work_orders", "work_order_type");

        fn source_fk(from: &Model) -> Option<i32> {
            from.work_order_type
        }
    }

    pub struct Equipment;

    impl Edge for Equipment {
        type From = Entity;
        type To = super::equipment::Entity;
        const SPEC: EdgeSpec = EdgeSpec::o2m("equipment", "equipment", "equipment_work_order");

        fn target_fk(to: &super::equipment::Model) -> Option<i32> {
            to.equipment_work_order
        }
    }

    pub struct Files;

    impl Edge for Files {
        type From = Entity;
        type To = super::file::Entity;
        const SPEC: EdgeSpec = EdgeSpec::o2m("files", "files", "work_order_files");

        fn target_fk(to: &super::file::Model) -> Option<i32> {
            to.work_order_files
        }
    }

    pub struct CheckListCategories;

    impl Edge for CheckListCategories {
        type From = Entity;
        type To = super::check_list_category::Entity;
        const SPEC: EdgeSpec = EdgeSpec::o2m(
            "check_list_categories",
            "check_list_categories",
            "work_order_check_list_categories",
        );

        fn target_fk(to: &super::check_list_category::Model) -> Option<i32> {
            to.work_order_check_list_categories
        }
    }
}

pub mod check_list_category {
    use entgraph::{Edge, EdgeSpec, GraphEntity};
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "check_list_categories")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub create_time: DateTimeUtc,
        pub update_time: DateTimeUtc,
        pub title: String,
        #[sea_orm(nullable)]
        pub description: Option<String>,
        #[sea_orm(nullable)]
        pub work_order_check_list_categories: Option<i32>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::work_order::Entity",
            from = "Column::WorkOrderCheckListCategories",
            to = "super::work_order::Column::Id",
            on_update = "NoAction",
            on_delete = "SetNull"
        )]
        WorkOrder,
        #[sea_orm(has_many = "super::check_list_item::Entity")]
        CheckListItems,
    }

    impl Related<super::work_order::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::WorkOrder.def()
        }
    }

    impl Related<super::check_list_item::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::CheckListItems.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}

    impl GraphEntity for Entity {
        const LABEL: &'static str = "check_list_category";
        type Id = i32;

        fn id_column() -> Column {
            Column::Id
        }

        fn id_of(model: &Model) -> i32 {
            model.id
        }

        fn create_time_column() -> Option<Column> {
            Some(Column::CreateTime)
        }

        fn update_time_column() -> Option<Column> {
            Some(Column::UpdateTime)
        }

        fn required_columns() -> Vec<Column> {
            vec![Column::Title]
        }
    }

    pub struct CheckListItems;

    impl Edge for CheckListItems {
        type From = Entity;
        type To = super::check_list_item::Entity;
        const SPEC: EdgeSpec = EdgeSpec::o2m(
            "check_list_items",
            "check_list_items",
            "check_list_category_check_list_items",
        );

        fn target_fk(to: &super::check_list_item::Model) -> Option<i32> {
            to.check_list_category_check_list_items
        }
    }

    pub struct WorkOrder;

    impl Edge for WorkOrder {
        type From = Entity;
        type To = super::work_order::Entity;
        const SPEC: EdgeSpec = EdgeSpec::m2o(
            "work_order",
            "check_list_categories",
            "work_order_check_list_categories",
        );

        fn source_fk(from: &Model) -> Option<i32> {
            from.work_order_check_list_categories
        }
    }
}

pub mod check_list_item {
    use entgraph::{Edge, EdgeSpec, GraphEntity};
    use sea_orm::entity::prelude::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
    #[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
    pub enum EnumSelectionMode {
        #[sea_orm(string_value = "single")]
        Single,
        #[sea_orm(string_value = "multiple")]
        Multiple,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
    #[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
    pub enum YesNo {
        #[sea_orm(string_value = "YES")]
        Yes,
        #[sea_orm(string_value = "NO")]
        No,
    }

    /// Check list items carry no timestamps.
    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "check_list_items")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub title: String,
        #[sea_orm(column_name = "type")]
        pub item_type: String,
        #[sea_orm(nullable)]
        pub index: Option<i32>,
        #[sea_orm(nullable)]
        pub checked: Option<bool>,
        #[sea_orm(nullable)]
        pub string_val: Option<String>,
        #[sea_orm(nullable)]
        pub enum_values: Option<String>,
        #[sea_orm(nullable)]
        pub enum_selection_mode_value: Option<EnumSelectionMode>,
        #[sea_orm(nullable)]
        pub selected_enum_values: Option<String>,
        #[sea_orm(nullable)]
        pub yes_no_val: Option<YesNo>,
        #[sea_orm(nullable)]
        pub help_text: Option<String>,
        #[sea_orm(nullable)]
        pub check_list_category_check_list_items: Option<i32>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::check_list_category::Entity",
            from = "Column::CheckListCategoryCheckListItems",
            to = "super::check_list_category::Column::Id",
            on_update = "NoAction",
            on_delete = "SetNull"
        )]
        CheckListCategory,
    }

    impl Related<super::check_list_category::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::CheckListCategory.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}

    impl GraphEntity for Entity {
        const LABEL: &'static str = "check_list_item";
        type Id = i32;

        fn id_column() -> Column {
            Column::Id
        }

        fn id_of(model: &Model) -> i32 {
            model.id
        }

        fn required_columns() -> Vec<Column> {
            vec![Column::Title, Column::ItemType]
        }
    }

    pub struct Files;

    impl Edge for Files {
        type From = Entity;
        type To = super::file::Entity;
        const SPEC: EdgeSpec = EdgeSpec::o2m("files", "files", "check_list_item_files");

        fn target_fk(to: &super::file::Model) -> Option<i32> {
            to.check_list_item_files
        }
    }

    pub struct CheckListCategory;

    impl Edge for CheckListCategory {
        type From = Entity;
        type To = super::check_list_category::Entity;
        const SPEC: EdgeSpec = EdgeSpec::m2o(
            "check_list_category",
            "check_list_items",
            "check_list_category_check_list_items",
        );

        fn source_fk(from: &Model) -> Option<i32> {
            from.check_list_category_check_list_items
        }
    }
}

pub mod file {
    use entgraph::{Edge, EdgeSpec, GraphEntity};
    use sea_orm::entity::prelude::*;
    use sea_orm::Value;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "files")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub create_time: DateTimeUtc,
        pub update_time: DateTimeUtc,
        #[sea_orm(column_name = "type")]
        pub file_type: String,
        pub name: String,
        #[sea_orm(nullable)]
        pub size: Option<i32>,
        #[sea_orm(nullable)]
        pub modified_at: Option<DateTimeUtc>,
        #[sea_orm(nullable)]
        pub uploaded_at: Option<DateTimeUtc>,
        pub content_type: String,
        pub store_key: String,
        #[sea_orm(nullable)]
        pub category: Option<String>,
        #[sea_orm(nullable)]
        pub check_list_item_files: Option<i32>,
        #[sea_orm(nullable)]
        pub equipment_files: Option<i32>,
        #[sea_orm(nullable)]
        pub work_order_files: Option<i32>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::check_list_item::Entity",
            from = "Column::CheckListItemFiles",
            to = "super::check_list_item::Column::Id",
            on_update = "NoAction",
            on_delete = "SetNull"
        )]
        CheckListItem,
        #[sea_orm(
            belongs_to = "super::equipment::Entity",
            from = "Column::EquipmentFiles",
            to = "super::equipment::Column::Id",
            on_update = "NoAction",
            on_delete = "SetNull"
        )]
        Equipment,
        #[sea_orm(
            belongs_to = "super::work_order::Entity",
            from = "Column::WorkOrderFiles",
            to = "super::work_order::Column::Id",
            on_update = "NoAction",
            on_delete = "SetNull"
        )]
        WorkOrder,
        #[sea_orm(has_one = "super::survey::Entity")]
        Survey,
    }

    impl Related<super::survey::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Survey.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}

    impl GraphEntity for Entity {
        const LABEL: &'static str = "file";
        type Id = i32;

        fn id_column() -> Column {
            Column::Id
        }

        fn id_of(model: &Model) -> i32 {
            model.id
        }

        fn create_time_column() -> Option<Column> {
            Some(Column::CreateTime)
        }

        fn update_time_column() -> Option<Column> {
            Some(Column::UpdateTime)
        }

        fn required_columns() -> Vec<Column> {
            vec![
                Column::FileType,
                Column::Name,
                Column::ContentType,
                Column::StoreKey,
            ]
        }

        fn validate(column: Column, value: &Value) -> Result<(), String> {
            match (column, value) {
                (Column::Size, Value::Int(Some(size))) if *size < 0 => {
                    Err(format!("value out of range: {}", size))
                }
                _ => Ok(()),
            }
        }
    }

    pub struct CheckListItem;

    impl Edge for CheckListItem {
        type From = Entity;
        type To = super::check_list_item::Entity;
        const SPEC: EdgeSpec = EdgeSpec::m2o("check_list_item", "files", "check_list_item_files");

        fn source_fk(from: &Model) -> Option<i32> {
            from.check_list_item_files
        }
    }

    pub struct Equipment;

    impl Edge for Equipment {
        type From = Entity;
        type To = super::equipment::Entity;
        const SPEC: EdgeSpec = EdgeSpec::m2o("equipment", "files", "equipment_files");

        fn source_fk(from: &Model) -> Option<i32> {
            from.equipment_files
        }
    }

    pub struct WorkOrder;

    impl Edge for WorkOrder {
        type From = Entity;
        type To = super::work_order::Entity;
        const SPEC: EdgeSpec = EdgeSpec::m2o("work_order", "files", "work_order_files");

        fn source_fk(from: &Model) -> Option<i32> {
            from.work_order_files
        }
    }

    /// The survey imported from this file, if any.
    pub struct Survey;

    impl Edge for Survey {
        type From = Entity;
        type To = super::survey::Entity;
        const SPEC: EdgeSpec = EdgeSpec::o2o("survey", false, "surveys", "survey_source_file");

        fn target_fk(to: &super::survey::Model) -> Option<i32> {
            to.survey_source_file
        }
    }
}

pub mod equipment {
    use entgraph::{Edge, EdgeSpec, GraphEntity};
    use sea_orm::entity::prelude::*;
    use sea_orm::Value;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "equipment")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub create_time: DateTimeUtc,
        pub update_time: DateTimeUtc,
        pub name: String,
        #[sea_orm(nullable)]
        pub future_state: Option<String>,
        #[sea_orm(nullable)]
        pub device_id: Option<String>,
        #[sea_orm(unique, nullable)]
        pub external_id: Option<String>,
        #[sea_orm(nullable)]
        pub equipment_work_order: Option<i32>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::work_order::Entity",
            from = "Column::EquipmentWorkOrder",
            to = "super::work_order::Column::Id",
            on_update = "NoAction",
            on_delete = "SetNull"
        )]
        WorkOrder,
    }

    impl Related<super::work_order::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::WorkOrder.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}

    impl GraphEntity for Entity {
        const LABEL: &'static str = "equipment";
        type Id = i32;

        fn id_column() -> Column {
            Column::Id
        }

        fn id_of(model: &Model) -> i32 {
            model.id
        }

        fn create_time_column() -> Option<Column> {
            Some(Column::CreateTime)
        }

        fn update_time_column() -> Option<Column> {
            Some(Column::UpdateTime)
        }

        fn required_columns() -> Vec<Column> {
            vec![Column::Name]
        }

        fn validate(column: Column, value: &Value) -> Result<(), String> {
            match column {
                Column::Name => super::not_empty(value),
                _ => Ok(()),
            }
        }
    }

    pub struct WorkOrder;

    impl Edge for WorkOrder {
        type From = Entity;
        type To = super::work_order::Entity;
        const SPEC: EdgeSpec = EdgeSpec::m2o("work_order", "equipment", "equipment_work_order");

        fn source_fk(from: &Model) -> Option<i32> {
            from.equipment_work_order
        }
    }

    pub struct Files;

    impl Edge for Files {
        type From = Entity;
        type To = super::file::Entity;
        const SPEC: EdgeSpec = EdgeSpec::o2m("files", "files", "equipment_files");

        fn target_fk(to: &super::file::Model) -> Option<i32> {
            to.equipment_files
        }
    }

    /// Services terminating at this equipment.
    pub struct Services;

    impl Edge for Services {
        type From = Entity;
        type To = super::service::Entity;
        const SPEC: EdgeSpec = EdgeSpec::m2m(
            "service",
            true,
            "service_terminations",
            ["service_id", "equipment_id"],
        );
    }
}

pub mod service {
    use entgraph::{Edge, EdgeSpec, GraphEntity};
    use sea_orm::entity::prelude::*;
    use sea_orm::Value;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "services")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub create_time: DateTimeUtc,
        pub update_time: DateTimeUtc,
        #[sea_orm(unique)]
        pub name: String,
        #[sea_orm(nullable)]
        pub external_id: Option<String>,
        pub status: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl GraphEntity for Entity {
        const LABEL: &'static str = "service";
        type Id = i32;

        fn id_column() -> Column {
            Column::Id
        }

        fn id_of(model: &Model) -> i32 {
            model.id
        }

        fn create_time_column() -> Option<Column> {
            Some(Column::CreateTime)
        }

        fn update_time_column() -> Option<Column> {
            Some(Column::UpdateTime)
        }

        fn required_columns() -> Vec<Column> {
            vec![Column::Name, Column::Status]
        }

        fn validate(column: Column, value: &Value) -> Result<(), String> {
            match column {
                Column::Name => super::not_empty(value),
                _ => Ok(()),
            }
        }
    }

    pub struct Terminations;

    impl Edge for Terminations {
        type From = Entity;
        type To = super::equipment::Entity;
        const SPEC: EdgeSpec = EdgeSpec::m2m(
            "termination_points",
            false,
            "service_terminations",
            ["service_id", "equipment_id"],
        );
    }

    pub struct Customers;

    impl Edge for Customers {
        type From = Entity;
        type To = super::customer::Entity;
        const SPEC: EdgeSpec = EdgeSpec::m2m(
            "customer",
            false,
            "service_customer",
            ["service_id", "customer_id"],
        );
    }
}

pub mod customer {
    use entgraph::{Edge, EdgeSpec, GraphEntity};
    use sea_orm::entity::prelude::*;
    use sea_orm::Value;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "customers")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub create_time: DateTimeUtc,
        pub update_time: DateTimeUtc,
        #[sea_orm(unique)]
        pub name: String,
        #[sea_orm(unique, nullable)]
        pub external_id: Option<String>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl GraphEntity for Entity {
        const LABEL: &'static str = "customer";
        type Id = i32;

        fn id_column() -> Column {
            Column::Id
        }

        fn id_of(model: &Model) -> i32 {
            model.id
        }

        fn create_time_column() -> Option<Column> {
            Some(Column::CreateTime)
        }

        fn update_time_column() -> Option<Column> {
            Some(Column::UpdateTime)
        }

        fn required_columns() -> Vec<Column> {
            vec![Column::Name]
        }

        fn validate(column: Column, value: &Value) -> Result<(), String> {
            match column {
                Column::Name | Column::ExternalId => super::not_empty(value),
                _ => Ok(()),
            }
        }
    }

    pub struct Services;

    impl Edge for Services {
        type From = Entity;
        type To = super::service::Entity;
        const SPEC: EdgeSpec = EdgeSpec::m2m(
            "services",
            true,
            "service_customer",
            ["service_id", "customer_id"],
        );
    }
}

pub mod survey {
    use entgraph::{Edge, EdgeSpec, GraphEntity};
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "surveys")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub create_time: DateTimeUtc,
        pub update_time: DateTimeUtc,
        pub name: String,
        #[sea_orm(nullable)]
        pub owner_name: Option<String>,
        #[sea_orm(nullable)]
        pub creation_timestamp: Option<DateTimeUtc>,
        pub completion_timestamp: DateTimeUtc,
        #[sea_orm(nullable)]
        pub survey_source_file: Option<i32>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::file::Entity",
            from = "Column::SurveySourceFile",
            to = "super::file::Column::Id",
            on_update = "NoAction",
            on_delete = "SetNull"
        )]
        SourceFile,
        #[sea_orm(has_many = "super::survey_question::Entity")]
        Questions,
    }

    impl Related<super::survey_question::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Questions.def()
        }
    }

    impl Related<super::file::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::SourceFile.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}

    impl GraphEntity for Entity {
        const LABEL: &'static str = "survey";
        type Id = i32;

        fn id_column() -> Column {
            Column::Id
        }

        fn id_of(model: &Model) -> i32 {
            model.id
        }

        fn create_time_column() -> Option<Column> {
            Some(Column::CreateTime)
        }

        fn update_time_column() -> Option<Column> {
            Some(Column::UpdateTime)
        }

        fn required_columns() -> Vec<Column> {
            vec![Column::Name, Column::CompletionTimestamp]
        }
    }

    pub struct SourceFile;

    impl Edge for SourceFile {
        type From = Entity;
        type To = super::file::Entity;
        const SPEC: EdgeSpec = EdgeSpec::o2o("source_file", true, "surveys", "survey_source_file");

        fn source_fk(from: &Model) -> Option<i32> {
            from.survey_source_file
        }
    }

    pub struct Questions;

    impl Edge for Questions {
        type From = Entity;
        type To = super::survey_question::Entity;
        const SPEC: EdgeSpec =
            EdgeSpec::o2m("questions", "survey_questions", "survey_question_survey");

        fn target_fk(to: &super::survey_question::Model) -> Option<i32> {
            to.survey_question_survey
        }
    }
}

pub mod survey_question {
    use entgraph::{Edge, EdgeSpec, GraphEntity};
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "survey_questions")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub create_time: DateTimeUtc,
        pub update_time: DateTimeUtc,
        #[sea_orm(nullable)]
        pub form_name: Option<String>,
        pub form_index: i32,
        #[sea_orm(nullable)]
        pub question_format: Option<String>,
        #[sea_orm(nullable)]
        pub question_text: Option<String>,
        pub question_index: i32,
        #[sea_orm(nullable)]
        pub bool_data: Option<bool>,
        #[sea_orm(nullable)]
        pub text_data: Option<String>,
        #[sea_orm(nullable)]
        pub float_data: Option<f64>,
        #[sea_orm(nullable)]
        pub int_data: Option<i32>,
        #[sea_orm(nullable)]
        pub survey_question_survey: Option<i32>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::survey::Entity",
            from = "Column::SurveyQuestionSurvey",
            to = "super::survey::Column::Id",
            on_update = "NoAction",
            on_delete = "SetNull"
        )]
        Survey,
    }

    impl Related<super::survey::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Survey.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}

    impl GraphEntity for Entity {
        const LABEL: &'static str = "survey_question";
        type Id = i32;

        fn id_column() -> Column {
            Column::Id
        }

        fn id_of(model: &Model) -> i32 {
            model.id
        }

        fn create_time_column() -> Option<Column> {
            Some(Column::CreateTime)
        }

        fn update_time_column() -> Option<Column> {
            Some(Column::UpdateTime)
        }

        fn required_columns() -> Vec<Column> {
            vec![Column::FormIndex, Column::QuestionIndex]
        }
    }

    pub struct Survey;

    impl Edge for Survey {
        type From = Entity;
        type To = super::survey::Entity;
        const SPEC: EdgeSpec = EdgeSpec::m2o("survey", "survey_questions", "survey_question_survey");

        fn source_fk(from: &Model) -> Option<i32> {
            from.survey_question_survey
        }
    }
}
