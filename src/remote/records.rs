//! `com.atproto.repo.*Record` calls.

use super::http_client::{parse_json, send_error};
use super::*;

impl XrpcClient {
    pub fn list_records(
        &self,
        owner: &str,
        collection: &str,
        cursor: Option<&str>,
        limit: u32,
    ) -> Result<RecordPage> {
        const CALL: &str = "com.atproto.repo.listRecords";
        let limit = limit.to_string();
        let mut query = vec![
            ("repo", owner),
            ("collection", collection),
            ("limit", limit.as_str()),
        ];
        if let Some(cursor) = cursor {
            query.push(("cursor", cursor));
        }

        with_retries(CALL, || {
            let resp = self
                .client
                .get(self.url(CALL))
                .header(reqwest::header::AUTHORIZATION, self.auth())
                .query(&query)
                .send()
                .map_err(send_error(CALL))?;
            parse_json::<RecordPage>(self.ensure_ok(resp, CALL)?, CALL)
        })
    }

    pub fn get_record(
        &self,
        owner: &str,
        collection: &str,
        record_key: &str,
    ) -> Result<ListedRecord> {
        const CALL: &str = "com.atproto.repo.getRecord";
        with_retries(CALL, || {
            let resp = self
                .client
                .get(self.url(CALL))
                .header(reqwest::header::AUTHORIZATION, self.auth())
                .query(&[
                    ("repo", owner),
                    ("collection", collection),
                    ("rkey", record_key),
                ])
                .send()
                .map_err(send_error(CALL))?;
            parse_json::<ListedRecord>(self.ensure_ok(resp, CALL)?, CALL)
        })
    }

    pub fn create_record(
        &self,
        owner: &str,
        collection: &str,
        record: &PinRecord,
    ) -> Result<CreatedRecord> {
        const CALL: &str = "com.atproto.repo.createRecord";
        let resp = self
            .client
            .post(self.url(CALL))
            .header(reqwest::header::AUTHORIZATION, self.auth())
            .json(&CreateRecordRequest {
                repo: owner,
                collection,
                record,
            })
            .send()
            .map_err(send_error(CALL))?;
        let created: CreatedRecord = parse_json(self.ensure_ok(resp, CALL)?, CALL)?;
        if created.record_key().is_none() {
            return Err(PinsError::remote_status(
                CALL,
                200,
                format!("response uri has no record key: {}", created.uri),
            ));
        }
        Ok(created)
    }

    pub fn delete_record(&self, owner: &str, collection: &str, record_key: &str) -> Result<()> {
        const CALL: &str = "com.atproto.repo.deleteRecord";
        let resp = self
            .client
            .post(self.url(CALL))
            .header(reqwest::header::AUTHORIZATION, self.auth())
            .json(&DeleteRecordRequest {
                repo: owner,
                collection,
                rkey: record_key,
            })
            .send()
            .map_err(send_error(CALL))?;
        self.ensure_ok(resp, CALL)?;
        Ok(())
    }
}
