use log::debug;
use pyo3::create_exception;
use pyo3::exceptions::{PyException, PyOSError};
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyModule};
use pyo3::{pyclass, pyfunction, pymethods, pymodule, PyErr, PyObject, PyRef, PyResult, Python};

use std::io::BufRead;
use std::path::PathBuf;

use crate::base::{Label, Score, TableValue};
use crate::error::Error;
use crate::scan::{
    scan_collection, scan_collection_tsv, scan_topics, scan_topics_tsv, CollectionOptions,
    CollectionScanner, DecodePolicy, TopicField, TopicScanner, TsvOptions, TsvScanner,
};
use crate::tables::qrels::{load_qrels as rs_load_qrels, write_qrels as rs_write_qrels};
use crate::tables::runs::{
    load_runs as rs_load_runs, load_runs_ranked_tsv, write_runs as rs_write_runs,
    RunLoadOptions, WriteRunOptions,
};
use crate::tables::{sort_for_output, QueryDocTable};

create_exception!(trec_tools, FormatError, PyException);
create_exception!(trec_tools, ConfigurationError, PyException);
create_exception!(trec_tools, MalformedInputError, PyException);

impl From<Error> for PyErr {
    fn from(error: Error) -> Self {
        let message = error.to_string();
        match error {
            Error::Format { .. } | Error::Decode { .. } => FormatError::new_err(message),
            Error::Configuration(_) => ConfigurationError::new_err(message),
            Error::MalformedInput { .. } => MalformedInputError::new_err(message),
            Error::Io { .. } => PyOSError::new_err(message),
        }
    }
}

fn table_to_dict<V: TableValue + ToPyObject>(
    py: Python<'_>,
    table: &QueryDocTable<V>,
) -> PyResult<PyObject> {
    let dict = PyDict::new(py);
    for query in table.queries() {
        let docs = PyDict::new(py);
        for (docid, value) in query.iter() {
            docs.set_item(docid, value)?;
        }
        dict.set_item(query.qid(), docs)?;
    }
    Ok(dict.to_object(py))
}

fn dict_to_table<V>(dict: &PyDict) -> PyResult<QueryDocTable<V>>
where
    V: TableValue + for<'a> FromPyObject<'a>,
{
    let mut table = QueryDocTable::new();
    for (qid, docs) in dict.iter() {
        let qid: String = qid.extract()?;
        let docs: &PyDict = docs.downcast()?;
        for (docid, value) in docs.iter() {
            let docid: String = docid.extract()?;
            table.insert(&qid, &docid, value.extract()?);
        }
    }
    Ok(table)
}

/// Python `top_k` must be None or a positive int
fn run_options(top_k: Option<&PyAny>) -> PyResult<RunLoadOptions> {
    let top_k = match top_k {
        None => None,
        Some(value) if value.is_none() => None,
        Some(value) => match value.extract::<i64>() {
            Ok(k) if k > 0 => Some(k as usize),
            _ => {
                return Err(ConfigurationError::new_err(format!(
                    "Unexpected type of topk: expected positive int, but got {}",
                    value
                )))
            }
        },
    };
    Ok(RunLoadOptions { top_k })
}

#[pyfunction]
fn load_qrels(py: Python<'_>, path: PathBuf) -> PyResult<PyObject> {
    table_to_dict(py, &rs_load_qrels(&path)?)
}

#[pyfunction]
#[pyo3(signature = (path, topk=None))]
fn load_runs(py: Python<'_>, path: PathBuf, topk: Option<&PyAny>) -> PyResult<PyObject> {
    let options = run_options(topk)?;
    table_to_dict(py, &rs_load_runs(&path, &options)?)
}

#[pyfunction]
#[pyo3(signature = (path, topk=None))]
fn load_runs_tsv(py: Python<'_>, path: PathBuf, topk: Option<&PyAny>) -> PyResult<PyObject> {
    let options = run_options(topk)?;
    table_to_dict(py, &load_runs_ranked_tsv(&path, &options)?)
}

#[pyfunction]
fn write_qrels(qrels: &PyDict, path: PathBuf) -> PyResult<()> {
    rs_write_qrels(&dict_to_table::<Label>(qrels)?, &path)?;
    Ok(())
}

#[pyfunction]
#[pyo3(signature = (run, path, tag="test"))]
fn write_runs(run: &PyDict, path: PathBuf, tag: &str) -> PyResult<()> {
    let options = WriteRunOptions {
        tag: tag.to_string(),
    };
    rs_write_runs(&dict_to_table::<Score>(run)?, &path, &options)?;
    Ok(())
}

fn sorted_to_dict<V: TableValue + ToPyObject>(
    py: Python<'_>,
    table: &QueryDocTable<V>,
) -> PyResult<PyObject> {
    let dict = PyDict::new(py);
    for (qid, docs) in sort_for_output(table) {
        let sorted = PyDict::new(py);
        for (docid, value) in docs {
            sorted.set_item(docid, value)?;
        }
        dict.set_item(qid, sorted)?;
    }
    Ok(dict.to_object(py))
}

/// Sorts a qrels or run dictionary (labels first, then scores)
#[pyfunction]
fn sort_qid_docid_value_dict(py: Python<'_>, table: &PyDict) -> PyResult<PyObject> {
    match dict_to_table::<Label>(table) {
        Ok(qrels) => sorted_to_dict(py, &qrels),
        Err(_) => sorted_to_dict(py, &dict_to_table::<Score>(table)?),
    }
}

#[pyclass(unsendable, name = "TopicIterator")]
struct PyTopicIterator {
    inner: TopicScanner<Box<dyn BufRead>>,
}

#[pymethods]
impl PyTopicIterator {
    fn __iter__(slf: PyRef<Self>) -> PyRef<Self> {
        slf
    }

    fn __next__(&mut self, py: Python<'_>) -> PyResult<Option<(String, PyObject)>> {
        match self.inner.next() {
            None => Ok(None),
            Some(topic) => {
                let topic = topic?;
                let fields = PyDict::new(py);
                for (field, tokens) in topic.fields.iter() {
                    fields.set_item(field.as_str(), tokens)?;
                }
                Ok(Some((topic.qid, fields.to_object(py))))
            }
        }
    }
}

#[pyclass(unsendable, name = "CollectionIterator")]
struct PyCollectionIterator {
    inner: CollectionScanner<Box<dyn BufRead>>,
}

#[pymethods]
impl PyCollectionIterator {
    fn __iter__(slf: PyRef<Self>) -> PyRef<Self> {
        slf
    }

    fn __next__(&mut self) -> PyResult<Option<(String, String)>> {
        match self.inner.next() {
            None => Ok(None),
            Some(document) => {
                let document = document?;
                Ok(Some((document.docid, document.text)))
            }
        }
    }

    /// Number of lines that could not be decoded
    #[getter]
    fn skipped_lines(&self) -> usize {
        self.inner.skipped_lines()
    }
}

#[pyclass(unsendable, name = "TsvIterator")]
struct PyTsvIterator {
    inner: TsvScanner<Box<dyn BufRead>>,
}

#[pymethods]
impl PyTsvIterator {
    fn __iter__(slf: PyRef<Self>) -> PyRef<Self> {
        slf
    }

    fn __next__(&mut self) -> PyResult<Option<(String, String)>> {
        match self.inner.next() {
            None => Ok(None),
            Some(pair) => Ok(Some(pair?)),
        }
    }
}

#[pyfunction]
#[pyo3(signature = (path, fields=None))]
fn load_topic_trec(path: PathBuf, fields: Option<Vec<String>>) -> PyResult<PyTopicIterator> {
    let fields = match fields {
        Some(names) => names
            .iter()
            .map(|name| name.parse::<TopicField>())
            .collect::<Result<Vec<_>, _>>()?,
        None => vec![TopicField::Title],
    };
    Ok(PyTopicIterator {
        inner: scan_topics(&path, &fields)?,
    })
}

#[pyfunction]
#[pyo3(signature = (path, delimiter="\t"))]
fn load_topic_tsv(path: PathBuf, delimiter: &str) -> PyResult<PyTsvIterator> {
    let options = TsvOptions {
        delimiter: delimiter.to_string(),
    };
    Ok(PyTsvIterator {
        inner: scan_topics_tsv(&path, &options)?,
    })
}

#[pyfunction]
#[pyo3(signature = (path, decode_policy="skip"))]
fn load_collection_trec(path: PathBuf, decode_policy: &str) -> PyResult<PyCollectionIterator> {
    let options = CollectionOptions {
        decode_policy: decode_policy.parse::<DecodePolicy>()?,
    };
    Ok(PyCollectionIterator {
        inner: scan_collection(&path, &options)?,
    })
}

#[pyfunction]
#[pyo3(signature = (path, delimiter="\t"))]
fn load_collection_tsv(path: PathBuf, delimiter: &str) -> PyResult<PyTsvIterator> {
    let options = TsvOptions {
        delimiter: delimiter.to_string(),
    };
    Ok(PyTsvIterator {
        inner: scan_collection_tsv(&path, &options)?,
    })
}

/// A Python module implemented in Rust.
#[pymodule]
fn trec_tools(py: Python, module: &PyModule) -> PyResult<()> {
    // Init logging
    pyo3_log::init();
    debug!("Loading trec-tools extension");

    module.add("FormatError", py.get_type::<FormatError>())?;
    module.add("ConfigurationError", py.get_type::<ConfigurationError>())?;
    module.add("MalformedInputError", py.get_type::<MalformedInputError>())?;

    module.add_function(wrap_pyfunction!(load_qrels, module)?)?;
    module.add_function(wrap_pyfunction!(load_runs, module)?)?;
    module.add_function(wrap_pyfunction!(load_runs_tsv, module)?)?;
    module.add_function(wrap_pyfunction!(write_qrels, module)?)?;
    module.add_function(wrap_pyfunction!(write_runs, module)?)?;
    module.add_function(wrap_pyfunction!(sort_qid_docid_value_dict, module)?)?;
    module.add_function(wrap_pyfunction!(load_topic_trec, module)?)?;
    module.add_function(wrap_pyfunction!(load_topic_tsv, module)?)?;
    module.add_function(wrap_pyfunction!(load_collection_trec, module)?)?;
    module.add_function(wrap_pyfunction!(load_collection_tsv, module)?)?;

    module.add_class::<PyTopicIterator>()?;
    module.add_class::<PyCollectionIterator>()?;
    module.add_class::<PyTsvIterator>()?;

    Ok(())
}
