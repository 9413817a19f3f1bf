use chunkwise_core::Document;
use serde_json::{Map, Value};

/// Splits a JSON value into objects whose serialized size stays under
/// `max_chunk_size`, keeping each value at its original key path.
pub struct JsonSplitter {
    max_chunk_size: usize,
    min_chunk_size: usize,
    convert_lists: bool,
}

impl JsonSplitter {
    pub fn new(max_chunk_size: usize) -> Self {
        Self {
            max_chunk_size,
            min_chunk_size: max_chunk_size.saturating_sub(200).max(50),
            convert_lists: false,
        }
    }

    pub fn with_min_chunk_size(mut self, min_chunk_size: usize) -> Self {
        self.min_chunk_size = min_chunk_size;
        self
    }

    /// Turn arrays into objects keyed by index so they can be split too.
    pub fn convert_lists(mut self, convert: bool) -> Self {
        self.convert_lists = convert;
        self
    }

    pub fn split_json(&self, data: &Value) -> Vec<Value> {
        let data = if self.convert_lists {
            lists_to_objects(data)
        } else {
            data.clone()
        };

        if !data.is_object() {
            return vec![data];
        }

        let mut chunks = vec![Map::new()];
        self.split_into(&data, &mut Vec::new(), &mut chunks);
        chunks
            .into_iter()
            .filter(|c| !c.is_empty())
            .map(Value::Object)
            .collect()
    }

    pub fn split_text(&self, data: &Value) -> Vec<String> {
        self.split_json(data).iter().map(Value::to_string).collect()
    }

    pub fn create_documents(&self, values: &[Value]) -> Vec<Document> {
        values
            .iter()
            .flat_map(|v| self.split_text(v))
            .map(Document::new)
            .collect()
    }

    fn split_into(&self, data: &Value, path: &mut Vec<String>, chunks: &mut Vec<Map<String, Value>>) {
        let Value::Object(map) = data else {
            if let Some(last) = chunks.last_mut() {
                set_nested(last, path, data.clone());
            }
            return;
        };

        for (key, value) in map {
            path.push(key.clone());

            let current = chunks.last().map(json_size_of_map).unwrap_or(0);
            let mut single = Map::new();
            single.insert(key.clone(), value.clone());
            let size = json_size_of_map(&single);
            let remaining = self.max_chunk_size.saturating_sub(current);

            if size < remaining {
                if let Some(last) = chunks.last_mut() {
                    set_nested(last, path, value.clone());
                }
            } else {
                if current >= self.min_chunk_size {
                    chunks.push(Map::new());
                }
                self.split_into(value, path, chunks);
            }

            path.pop();
        }
    }
}

impl Default for JsonSplitter {
    fn default() -> Self {
        Self::new(300)
    }
}

fn json_size_of_map(map: &Map<String, Value>) -> usize {
    serde_json::to_string(map).map(|s| s.len()).unwrap_or(0)
}

fn set_nested(map: &mut Map<String, Value>, path: &[String], value: Value) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };

    let mut cursor = map;
    for key in parents {
        let entry = cursor
            .entry(key.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        cursor = match entry {
            Value::Object(next) => next,
            _ => return,
        };
    }
    cursor.insert(last.clone(), value);
}

fn lists_to_objects(data: &Value) -> Value {
    match data {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), lists_to_objects(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Object(
            items
                .iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), lists_to_objects(v)))
                .collect(),
        ),
        other => other.clone(),
    }
}
