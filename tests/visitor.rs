mod common;

use std::sync::Arc;

use common::Employee;
use relq::expr::Visitor;
use relq::prelude::*;

#[derive(Default)]
struct EntityCollector {
    variables: Vec<String>,
}

impl Visitor for EntityCollector {
    fn visit_entity(&mut self, entity: &Arc<RelationalPath>) {
        self.variables.push(entity.variable().to_owned());
    }
}

#[derive(Default)]
struct PathCollector {
    paths: Vec<String>,
}

impl Visitor for PathCollector {
    fn visit_path(&mut self, path: &Path) {
        self.paths.push(format!("{path:?}"));
    }
}

#[test]
fn metadata_walk_reaches_nested_join_contents() {
    let emp = Employee::new("EMP");
    let peer = Employee::new("PEER");
    let sup = Employee::new("SUP");

    let nested = peer
        .rel
        .inner_join(&sup.rel)
        .on(peer.superior_id.eq(&sup.id))
        .unwrap();
    let query = SqlQuery::new()
        .from(&emp.rel)
        .left_join(nested)
        .on(sup.id.eq(&emp.superior_id))
        .unwrap();

    let mut collector = EntityCollector::default();
    query.metadata().accept(&mut collector);
    assert_eq!(collector.variables, ["EMP", "PEER", "SUP"]);
}

#[test]
fn expression_walk_is_pre_order() {
    let emp = Employee::new("EMP");
    let pred = emp.superior_id.eq(&emp.id).and(emp.salary.gt(1));

    let mut collector = PathCollector::default();
    pred.expression().accept(&mut collector);
    assert_eq!(
        collector.paths,
        [
            "Path(EMP.superiorId)",
            "Path(EMP.id)",
            "Path(EMP.salary)"
        ]
    );
}

#[test]
fn subquery_walk_reaches_the_inner_metadata() {
    let emp = Employee::new("EMP");
    let sub = SqlQuery::new()
        .select([Expression::from(&emp.id)])
        .from(&emp.rel);

    let mut collector = EntityCollector::default();
    Expression::from(sub).accept(&mut collector);
    assert_eq!(collector.variables, ["EMP"]);
}
