mod helpers;

use entgraph::{id_eq, Aggregate, Cursor, Edge, EdgeSpec, EntError, EntResultExt};
use helpers::*;
use inventory::entities::*;
use inventory::InventoryClient;
use sea_orm::{ColumnTrait, DbErr, FromQueryResult, Order};

#[tokio::test]
async fn test_eager_load_nested_o2m() -> Result<(), DbErr> {
    let client = setup_test_db().await?;
    let wo = create_work_order(&client, "fiber install").await?;
    create_work_order(&client, "no checklist").await?;

    let category = client
        .check_list_category()
        .create()
        .set(check_list_category::Column::Title, "safety")
        .set_edge(check_list_category::WorkOrder, wo.id)
        .save()
        .await?;
    for title in ["helmet", "gloves"] {
        client
            .check_list_item()
            .create()
            .set(check_list_item::Column::Title, title)
            .set(check_list_item::Column::ItemType, "simple")
            .set_edge(check_list_item::CheckListCategory, category.id)
            .exec()
            .await?;
    }

    let orders = client
        .work_order()
        .query()
        .order_by(work_order::Column::Id, Order::Asc)
        .with_opts(work_order::CheckListCategories, |q| {
            q.with(check_list_category::CheckListItems)
        })
        .all()
        .await?;
    assert_eq!(orders.len(), 2);

    let categories = orders[0].edges.get::<work_order::CheckListCategories>()?;
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].title, "safety");
    let items = categories[0]
        .edges
        .get::<check_list_category::CheckListItems>()?;
    let mut titles: Vec<_> = items.iter().map(|i| i.title.clone()).collect();
    titles.sort();
    assert_eq!(titles, vec!["gloves", "helmet"]);

    // Loaded, but without neighbors.
    assert!(orders[1]
        .edges
        .get::<work_order::CheckListCategories>()?
        .is_empty());

    let err = orders[0].edges.get::<work_order::Files>().unwrap_err();
    assert!(matches!(err, EntError::NotLoaded { edge: "files" }));
    assert!(err.is_not_loaded());

    Ok(())
}

#[tokio::test]
async fn test_eager_load_m2o_with_nil_key() -> Result<(), DbErr> {
    let client = setup_test_db().await?;
    let wo = create_work_order(&client, "splice").await?;
    let attached = create_file(&client, "attached.png").await?;
    create_file(&client, "loose.png").await?;
    client
        .file()
        .update_one(&attached)
        .set_edge(file::WorkOrder, wo.id)
        .exec()
        .await?;

    let files = client
        .file()
        .query()
        .order_by(file::Column::Id, Order::Asc)
        .with(file::WorkOrder)
        .all()
        .await?;
    assert_eq!(files[0].edges.one::<file::WorkOrder>()?.name, "splice");
    assert!(files[1].edges.get::<file::WorkOrder>()?.is_empty());
    assert!(files[1]
        .edges
        .one::<file::WorkOrder>()
        .unwrap_err()
        .is_not_found());

    Ok(())
}

#[tokio::test]
async fn test_eager_load_m2m_both_directions() -> Result<(), DbErr> {
    let client = setup_test_db().await?;
    let router = create_equipment(&client, "router").await?;
    let switch = create_equipment(&client, "switch").await?;
    create_equipment(&client, "spare").await?;

    client
        .service()
        .create()
        .set(service::Column::Name, "internet")
        .set(service::Column::Status, "IN_SERVICE")
        .add_edge_ids(service::Terminations, [router.id, switch.id])
        .exec()
        .await?;
    client
        .service()
        .create()
        .set(service::Column::Name, "voice")
        .set(service::Column::Status, "PENDING")
        .add_edge_ids(service::Terminations, [router.id])
        .exec()
        .await?;

    let services = client
        .service()
        .query()
        .order_by(service::Column::Name, Order::Asc)
        .with(service::Terminations)
        .all()
        .await?;
    assert_eq!(services[0].edges.get::<service::Terminations>()?.len(), 2);
    assert_eq!(services[1].edges.get::<service::Terminations>()?.len(), 1);

    let equipment = client
        .equipment()
        .query()
        .order_by(equipment::Column::Id, Order::Asc)
        .with(equipment::Services)
        .all()
        .await?;
    let mut names: Vec<_> = equipment[0]
        .edges
        .get::<equipment::Services>()?
        .iter()
        .map(|s| s.name.clone())
        .collect();
    names.sort();
    assert_eq!(names, vec!["internet", "voice"]);
    assert_eq!(equipment[1].edges.get::<equipment::Services>()?.len(), 1);
    assert!(equipment[2].edges.get::<equipment::Services>()?.is_empty());

    Ok(())
}

/// Reads the file's equipment key while querying by its work order key.
struct MisroutedFiles;

impl Edge for MisroutedFiles {
    type From = work_order::Entity;
    type To = file::Entity;
    const SPEC: EdgeSpec = EdgeSpec::o2m("misrouted_files", "files", "work_order_files");

    fn target_fk(to: &file::Model) -> Option<i32> {
        to.equipment_files
    }
}

#[tokio::test]
async fn test_eager_load_reports_foreign_key_mismatch() -> Result<(), DbErr> {
    let client = setup_test_db().await?;
    let eq = create_equipment(&client, "olt").await?;
    create_work_order(&client, "first").await?;
    let wo = create_work_order(&client, "second").await?;
    let f = create_file(&client, "photo.png").await?;
    client
        .file()
        .update_one(&f)
        .set_edge(file::WorkOrder, wo.id)
        .exec()
        .await?;

    let query = || {
        client
            .work_order()
            .query()
            .filter(id_eq::<work_order::Entity>(wo.id))
            .with(MisroutedFiles)
    };

    let err = query().all().await.unwrap_err();
    assert_eq!(
        err.to_string(),
        format!("foreign-key \"work_order_files\" is nil for node {}", f.id)
    );

    client
        .file()
        .update_one(&f)
        .set_edge(file::Equipment, eq.id)
        .exec()
        .await?;
    let err = query().all().await.unwrap_err();
    assert_eq!(
        err.to_string(),
        format!(
            "unexpected foreign-key \"work_order_files\" returned {} for node {}",
            eq.id, f.id
        )
    );

    Ok(())
}

#[tokio::test]
async fn test_query_edge_paths() -> Result<(), DbErr> {
    let client = setup_test_db().await?;
    let wo = create_work_order(&client, "cabinet").await?;
    let other = create_work_order(&client, "pole").await?;
    for name in ["a.png", "b.png"] {
        let f = create_file(&client, name).await?;
        client
            .work_order()
            .update_one(&wo)
            .add_edge_ids(work_order::Files, [f.id])
            .exec()
            .await?;
    }
    let stray = create_file(&client, "c.png").await?;
    client
        .work_order()
        .update_one(&other)
        .add_edge_ids(work_order::Files, [stray.id])
        .exec()
        .await?;

    assert_eq!(
        client
            .work_order()
            .query_edge(&wo, work_order::Files)
            .count()
            .await?,
        2
    );

    let owner = client
        .file()
        .query_edge(&stray, file::WorkOrder)
        .only()
        .await?;
    assert_eq!(owner.id, other.id);

    let names = client
        .work_order()
        .query()
        .filter(work_order::Column::Name.eq("cabinet"))
        .query_edge(work_order::Files)
        .order_by(file::Column::Name, Order::Desc)
        .select([file::Column::Name])
        .strings()
        .await?;
    assert_eq!(names, vec!["b.png", "a.png"]);

    let router = create_equipment(&client, "router").await?;
    let svc = client
        .service()
        .create()
        .set(service::Column::Name, "backhaul")
        .set(service::Column::Status, "IN_SERVICE")
        .add_edge_ids(service::Terminations, [router.id])
        .save()
        .await?;
    let ids = client
        .service()
        .query_edge(&svc, service::Terminations)
        .ids()
        .await?;
    assert_eq!(ids, vec![router.id]);

    Ok(())
}

#[tokio::test]
async fn test_first_only_and_counting() -> Result<(), DbErr> {
    let client = setup_test_db().await?;
    for name in ["alpha", "beta", "gamma"] {
        create_work_order(&client, name).await?;
    }
    let orders = client.work_order();

    let first = orders
        .query()
        .order_by(work_order::Column::Name, Order::Desc)
        .first()
        .await?;
    assert_eq!(first.name, "gamma");

    let beta = orders
        .query()
        .filter(work_order::Column::Name.eq("beta"))
        .only()
        .await?;
    assert_eq!(
        orders
            .query()
            .filter(work_order::Column::Name.eq("beta"))
            .only_id()
            .await?,
        beta.id
    );
    assert_eq!(orders.get(beta.id).await?.name, "beta");

    let err = orders.query().only().await.unwrap_err();
    assert!(err.is_not_singular());
    assert_eq!(err.to_string(), "entgraph: work_order not singular");

    let missing = orders.query().filter(work_order::Column::Name.eq("delta"));
    let err = missing.clone().first().await.unwrap_err();
    assert_eq!(err.to_string(), "entgraph: work_order not found");
    assert!(missing.clone().first_id().await.mask_not_found()?.is_none());
    assert!(missing.only_id().await.unwrap_err().is_not_found());

    let all = orders.query();
    let narrowed = all.clone().filter(work_order::Column::Name.ne("alpha"));
    assert_eq!(narrowed.count().await?, 2);
    assert_eq!(all.count().await? as usize, all.clone().all().await?.len());
    assert_eq!(all.count().await?, 3);

    let limited = orders.query().limit(1);
    assert_eq!(limited.count().await?, 3);
    assert!(limited.exist().await?);
    assert!(!orders
        .query()
        .filter(work_order::Column::Name.eq("delta"))
        .exist()
        .await?);

    let page = orders
        .query()
        .order_by(work_order::Column::Name, Order::Asc)
        .offset(1)
        .limit(1)
        .all()
        .await?;
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].name, "beta");

    let statuses = orders
        .query()
        .unique(true)
        .select([work_order::Column::Status])
        .strings()
        .await?;
    assert_eq!(statuses, vec![work_order::STATUS_PLANNED]);

    Ok(())
}

#[derive(Debug, FromQueryResult)]
struct StatusCount {
    status: String,
    count: i64,
}

#[tokio::test]
async fn test_group_by_and_select() -> Result<(), DbErr> {
    let client = setup_test_db().await?;
    for name in ["a", "b", "c"] {
        create_work_order(&client, name).await?;
    }
    client
        .work_order()
        .update()
        .filter(work_order::Column::Name.eq("c"))
        .set(work_order::Column::Status, work_order::STATUS_DONE)
        .exec()
        .await?;

    let rows: Vec<(String, i64)> = client
        .work_order()
        .query()
        .group_by([work_order::Column::Status])
        .aggregate(Aggregate::count())
        .order_by(work_order::Column::Status, Order::Asc)
        .tuples()
        .await?;
    assert_eq!(
        rows,
        vec![("DONE".to_string(), 1), ("PLANNED".to_string(), 2)]
    );

    for (name, index) in [("a", 1), ("b", 2), ("c", 5)] {
        client
            .work_order()
            .update()
            .filter(work_order::Column::Name.eq(name))
            .set(work_order::Column::Index, index)
            .exec()
            .await?;
    }
    let stats: Vec<(String, i64, f64)> = client
        .work_order()
        .query()
        .group_by([work_order::Column::Status])
        .aggregate(Aggregate::sum(work_order::Column::Index))
        .aggregate(Aggregate::mean(work_order::Column::Index).alias("avg_index"))
        .order_by(work_order::Column::Status, Order::Asc)
        .tuples()
        .await?;
    assert_eq!(
        stats,
        vec![("DONE".to_string(), 5, 5.0), ("PLANNED".to_string(), 3, 1.5)]
    );
    let indexes = client
        .work_order()
        .query()
        .group_by([work_order::Column::Index])
        .order_by(work_order::Column::Index, Order::Desc)
        .ints()
        .await?;
    assert_eq!(indexes, vec![5, 2, 1]);

    let busy: Vec<StatusCount> = client
        .work_order()
        .query()
        .group_by([work_order::Column::Status])
        .aggregate(Aggregate::count())
        .having_count_gt(1)
        .scan_into()
        .await?;
    assert_eq!(busy.len(), 1);
    assert_eq!(busy[0].status, "PLANNED");
    assert_eq!(busy[0].count, 2);

    let statuses = client
        .work_order()
        .query()
        .group_by([work_order::Column::Status])
        .aggregate(Aggregate::count())
        .order_by(work_order::Column::Status, Order::Asc)
        .strings()
        .await?;
    assert_eq!(statuses, vec!["DONE", "PLANNED"]);

    let err = client
        .work_order()
        .query()
        .group_by([work_order::Column::Status, work_order::Column::Priority])
        .strings()
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "entgraph: WorkOrderGroupBy.Strings is not achievable when grouping more than 1 field"
    );

    let err = client
        .work_order()
        .query()
        .select([work_order::Column::Id, work_order::Column::Name])
        .ints()
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "entgraph: WorkOrderSelect.Ints is not achievable when selecting more than 1 field"
    );

    let err = client
        .work_order()
        .query()
        .select([work_order::Column::Id, work_order::Column::Name])
        .tuples::<(i64,)>()
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        EntError::ColumnMismatch {
            expected: 1,
            got: 2
        }
    ));

    let pairs: Vec<(i64, String)> = client
        .work_order()
        .query()
        .order_by(work_order::Column::Id, Order::Asc)
        .select([work_order::Column::Id, work_order::Column::Name])
        .tuples()
        .await?;
    assert_eq!(pairs.len(), 3);
    assert_eq!(pairs[2].1, "c");

    Ok(())
}

#[tokio::test]
async fn test_survey_scalar_projections() -> Result<(), DbErr> {
    let client = setup_test_db().await?;
    let survey = client
        .survey()
        .create()
        .set(survey::Column::Name, "site walk")
        .set(survey::Column::CompletionTimestamp, chrono::Utc::now())
        .save()
        .await?;
    for (i, (flag, score)) in [(true, 1.5), (false, 2.5)].into_iter().enumerate() {
        client
            .survey_question()
            .create()
            .set(survey_question::Column::FormIndex, 0)
            .set(survey_question::Column::QuestionIndex, i as i32)
            .set(survey_question::Column::BoolData, flag)
            .set(survey_question::Column::FloatData, score)
            .set_edge(survey_question::Survey, survey.id)
            .exec()
            .await?;
    }

    let questions = client.survey_question();
    let by_index = || {
        questions
            .query()
            .order_by(survey_question::Column::QuestionIndex, Order::Asc)
    };
    assert_eq!(
        by_index()
            .select([survey_question::Column::BoolData])
            .bools()
            .await?,
        vec![true, false]
    );
    assert_eq!(
        by_index()
            .select([survey_question::Column::FloatData])
            .float64s()
            .await?,
        vec![1.5, 2.5]
    );
    assert_eq!(
        by_index()
            .select([survey_question::Column::QuestionIndex])
            .ints()
            .await?,
        vec![0, 1]
    );

    let loaded = client
        .survey()
        .query()
        .with_opts(survey::Questions, |q| {
            q.filter(survey_question::Column::BoolData.eq(true))
        })
        .only()
        .await?;
    assert_eq!(loaded.edges.get::<survey::Questions>()?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_cursor_pagination() -> Result<(), DbErr> {
    let client = setup_test_db().await?;
    for i in 0..5 {
        create_equipment(&client, &format!("eq-{}", i)).await?;
    }
    let names = |conn: &entgraph::Connection<equipment::Entity>| {
        conn.nodes().map(|n| n.name.clone()).collect::<Vec<_>>()
    };
    let equipment = client.equipment();

    let page = equipment.query().paginate(None, Some(2), None, None).await?;
    assert_eq!(names(&page), vec!["eq-0", "eq-1"]);
    assert!(page.page_info.has_next_page);
    assert!(!page.page_info.has_previous_page);
    assert_eq!(page.page_info.start_cursor, Some(page.edges[0].cursor.clone()));

    let after = page.page_info.end_cursor.clone();
    let page = equipment
        .query()
        .paginate(after.as_ref(), Some(2), None, None)
        .await?;
    assert_eq!(names(&page), vec!["eq-2", "eq-3"]);

    let after: Cursor = page.edges[1].cursor.encode().parse()?;
    let page = equipment
        .query()
        .paginate(Some(&after), Some(2), None, None)
        .await?;
    assert_eq!(names(&page), vec!["eq-4"]);
    assert!(!page.page_info.has_next_page);

    let page = equipment.query().paginate(None, None, None, Some(2)).await?;
    assert_eq!(names(&page), vec!["eq-3", "eq-4"]);
    assert!(page.page_info.has_previous_page);

    let before = page.page_info.start_cursor.clone();
    let page = equipment
        .query()
        .paginate(None, None, before.as_ref(), Some(10))
        .await?;
    assert_eq!(names(&page), vec!["eq-0", "eq-1", "eq-2"]);
    assert!(!page.page_info.has_previous_page);

    let empty = equipment.query().paginate(None, Some(0), None, None).await?;
    assert!(empty.edges.is_empty());
    assert_eq!(empty.page_info, entgraph::PageInfo::default());

    let err = equipment
        .query()
        .paginate(None, Some(1), None, Some(1))
        .await
        .unwrap_err();
    assert!(matches!(err, EntError::InvalidPagination));
    let err = equipment
        .query()
        .paginate(None, Some(-1), None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, EntError::InvalidPagination));

    Ok(())
}

#[tokio::test]
async fn test_pagination_walks_every_node_in_id_order() -> Result<(), DbErr> {
    let client = setup_test_db().await?;
    for name in ["c", "a", "b", "e", "d"] {
        create_equipment(&client, name).await?;
    }
    let equipment = client.equipment();

    let err = equipment
        .query()
        .order_by(equipment::Column::Name, Order::Asc)
        .paginate(None, Some(2), None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, EntError::InvalidPagination));

    let mut seen = Vec::new();
    let mut after: Option<Cursor> = None;
    loop {
        let page = equipment
            .query()
            .paginate(after.as_ref(), Some(2), None, None)
            .await?;
        seen.extend(page.nodes().map(|n| n.name.clone()));
        if !page.page_info.has_next_page {
            break;
        }
        after = page.page_info.end_cursor;
    }
    assert_eq!(seen, vec!["c", "a", "b", "e", "d"]);

    let all = equipment.query().paginate(None, None, None, None).await?;
    assert_eq!(all.edges.len(), 5);
    assert!(!all.page_info.has_next_page);

    Ok(())
}
