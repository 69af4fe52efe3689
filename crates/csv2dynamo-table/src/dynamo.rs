// DynamoDB implementation
//
// PutItem overwrites by partition key, which is exactly the pipeline's
// upsert-by-id contract. Attribute mapping: integers/floats -> N,
// text/timestamps -> S, booleans -> BOOL, byte sequences -> B.

use crate::{PutError, TableWriter};
use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::primitives::Blob;
use aws_sdk_dynamodb::types::AttributeValue;
use csv2dynamo_core::{FieldValue, Record};
use std::collections::HashMap;

pub struct DynamoTable {
    client: aws_sdk_dynamodb::Client,
}

impl DynamoTable {
    pub fn new(client: aws_sdk_dynamodb::Client) -> Self {
        Self { client }
    }
}

fn to_attribute(value: &FieldValue) -> AttributeValue {
    match value {
        FieldValue::Text(s) => AttributeValue::S(s.clone()),
        FieldValue::Integer(n) => AttributeValue::N(n.to_string()),
        FieldValue::Float(x) => AttributeValue::N(x.to_string()),
        FieldValue::Bool(b) => AttributeValue::Bool(*b),
        FieldValue::Bytes(b) => AttributeValue::B(Blob::new(b.clone())),
        FieldValue::Timestamp(_) => AttributeValue::S(value.to_string()),
    }
}

pub(crate) fn to_item(record: &Record) -> HashMap<String, AttributeValue> {
    record
        .fields()
        .map(|(name, value)| (name.to_string(), to_attribute(value)))
        .collect()
}

#[async_trait]
impl TableWriter for DynamoTable {
    async fn put_record(&self, table: &str, record: &Record) -> Result<(), PutError> {
        self.client
            .put_item()
            .table_name(table)
            .set_item(Some(to_item(record)))
            .send()
            .await
            .map_err(|e| PutError(format!("{}", DisplayErrorContext(e))))?;
        Ok(())
    }
}
