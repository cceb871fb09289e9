use codspeed_criterion_compat::{Criterion, criterion_group, criterion_main};
use rdf_multiset_engine::Multiset;
use rdf_multiset_engine::group::{GroupBy, GroupByExpression, GroupByVariable, Grouping};
use rdf_multiset_functions::ExpressionEvaluator;
use rdf_multiset_model::{Expression, NamedNode, Variable, integer_literal};

const ROWS: i64 = 8192;

#[derive(Debug, Clone, Copy)]
enum GroupingScenario {
    FewGroups,
    ManyGroups,
    WithUnbound,
}

impl GroupingScenario {
    fn create_multiset(self) -> Multiset {
        let groups = match self {
            GroupingScenario::FewGroups => 4,
            GroupingScenario::ManyGroups | GroupingScenario::WithUnbound => 1024,
        };
        Multiset::from_rows(
            vec![Variable::new_unchecked("s"), Variable::new_unchecked("n")],
            (0..ROWS).map(|i| {
                let subject = NamedNode::new_unchecked(format!("http://example.com/{}", i % groups));
                let unbound = matches!(self, GroupingScenario::WithUnbound) && i % 7 == 0;
                vec![
                    (!unbound).then(|| subject.into()),
                    Some(integer_literal(i % 3).into()),
                ]
            }),
        )
    }
}

fn bench_all(c: &mut Criterion) {
    for scenario in [
        GroupingScenario::FewGroups,
        GroupingScenario::ManyGroups,
        GroupingScenario::WithUnbound,
    ] {
        let multiset = scenario.create_multiset();
        let ids = multiset.ids();

        let by_variable = GroupBy::new(vec![Box::new(GroupByVariable::new(
            Variable::new_unchecked("s"),
        ))]);
        c.bench_function(&format!("group_by_variable_{scenario:?}"), |b| {
            b.iter(|| by_variable.apply(&multiset, &ids).unwrap());
        });

        let chained = GroupBy::new(vec![
            Box::new(GroupByVariable::new(Variable::new_unchecked("s"))),
            Box::new(GroupByExpression::new(
                Expression::Add(
                    Box::new(Expression::Variable(Variable::new_unchecked("n"))),
                    Box::new(Expression::Literal(integer_literal(1))),
                ),
                ExpressionEvaluator::default(),
            )),
        ]);
        c.bench_function(&format!("group_by_chained_{scenario:?}"), |b| {
            b.iter(|| chained.apply(&multiset, &ids).unwrap());
        });
    }
}

criterion_group!(group_by, bench_all);
criterion_main!(group_by);
