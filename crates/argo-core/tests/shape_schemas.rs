//! JsonSchema validation of rendered response shapes.

use argo_core::records::*;
use argo_core::responses::*;
use schemars::schema_for;
use serde_json::json;

fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

macro_rules! validates_against_own_schema {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;
            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

fn sample_note() -> Note {
    Note {
        note_type: "abstract".into(),
        title: "Abstract".into(),
        source: "archivesspace".into(),
        subnotes: vec![Subnote {
            subnote_type: "text".into(),
            content: SubnoteContent::from(json!("Photographs of the Pocantico estate.")),
        }],
    }
}

fn sample_date() -> DateExpression {
    DateExpression {
        expression: "1920-1945".into(),
        begin: "1920-01-01".into(),
        end: Some("1945-12-31".into()),
        label: "1920-01-01".into(),
        date_type: "inclusive".into(),
    }
}

fn sample_reference(order: Option<i64>) -> Reference {
    Reference {
        title: "Series 1: Correspondence".into(),
        identifier: "col-2".into(),
        order,
        reference_type: Some("collection".into()),
    }
}

validates_against_own_schema!(
    list_item_schema,
    ListItem,
    ListItem {
        uri: "/agents/ag-1/".into(),
        title: "Rockefeller, Nelson A.".into(),
        resource_type: "person".into(),
        dates: Some(vec![sample_date()]),
    }
);

validates_against_own_schema!(
    list_page_schema,
    Page<ListEntry>,
    Page {
        count: 2,
        next: None,
        previous: None,
        results: vec![
            ListEntry::Item(ListItem {
                uri: "/terms/t-1/".into(),
                title: "Philanthropy".into(),
                resource_type: "topical".into(),
                dates: None,
            }),
            ListEntry::Invalid(InvalidEntry {
                id: "t-2".into(),
                error: "missing field `title`".into(),
            }),
        ],
    }
);

validates_against_own_schema!(
    agent_detail_schema,
    Detail<AgentRecord>,
    Detail {
        uri: "/agents/ag-1/".into(),
        record: AgentRecord {
            id: "ag-1".into(),
            title: "Rockefeller, Nelson A.".into(),
            agent_type: "person".into(),
            external_identifiers: vec![ExternalIdentifier {
                identifier: "/agents/people/1".into(),
                source: "archivesspace".into(),
            }],
            description: None,
            dates: Some(vec![sample_date()]),
            notes: Some(vec![sample_note()]),
            collections: Some(vec![sample_reference(Some(1))]),
            objects: None,
        },
    }
);

validates_against_own_schema!(
    collection_detail_schema,
    Detail<CollectionRecord>,
    Detail {
        uri: "/collections/col-1/".into(),
        record: CollectionRecord {
            id: "col-1".into(),
            title: "Nelson A. Rockefeller papers".into(),
            collection_type: "collection".into(),
            external_identifiers: vec![],
            level: "collection".into(),
            languages: Some(vec![Language {
                expression: "English".into(),
                identifier: "eng".into(),
            }]),
            extents: vec![Extent {
                value: 12.5,
                extent_type: "linear_feet".into(),
            }],
            dates: None,
            notes: None,
            rights_statements: Some(vec![RightsStatement {
                determination_date: "2018-01-01".into(),
                statement_type: "copyright".into(),
                rights_type: "copyright".into(),
                begin: "1920-01-01".into(),
                end: "2070-01-01".into(),
                copyright_status: Some("copyrighted".into()),
                other_basis: None,
                jurisdiction: Some("us".into()),
                notes: None,
                rights_granted: vec![RightsGranted {
                    act: "publish".into(),
                    begin: "1920-01-01".into(),
                    end: "2070-01-01".into(),
                    restriction: "disallow".into(),
                    notes: Some(vec![sample_note()]),
                }],
            }]),
            agents: None,
            creators: Some(vec![sample_reference(None)]),
            terms: None,
            ancestors: None,
            children: Some(vec![sample_reference(Some(2)), sample_reference(Some(1))]),
        },
    }
);
