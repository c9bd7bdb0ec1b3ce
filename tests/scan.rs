use helpers::fixtures::Fixtures;
use rstest::rstest;

use trec_tools::scan::{CollectionOptions, DecodePolicy, TsvOptions};
use trec_tools::{
    scan_collection, scan_collection_tsv, scan_topics, scan_topics_tsv, CollectionDocument, Error,
    Topic, TopicField,
};

/// Initialize the logger
fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

const TOPICS: &str = "<top>
<num> Number: 401
<title> foreign minorities, Germany

<desc> Description:
What language and cultural differences impede the integration
of foreign minorities in Germany?

<narr> Narrative:
A relevant document will focus on the causes of the lack of
integration in a significant way.
</top>

<top>
<num> Number: 402
<title> behavioral genetics

<desc> Description:
What is happening in the field of behavioral genetics?

<narr> Narrative:
Relevant documents cite a genetic basis.
</top>
";

const COLLECTION: &str = "<DOC>
<DOCNO> FBIS3-1 </DOCNO>
<HT> header </HT>
<TEXT>
Language: English
Article Type: BFN
</TEXT>
</DOC>

<DOC>
<DOCNO>FBIS3-2</DOCNO>
<TEXT>
  second
  document
</TEXT>
</DOC>


";

fn read_topics(fields: &[TopicField]) -> Vec<Topic> {
    let fixtures = Fixtures::new();
    let path = fixtures.write("topics.txt", TOPICS);
    scan_topics(&path, fields)
        .expect("Error while opening topics")
        .map(|t| t.expect("Error while reading a topic"))
        .collect()
}

#[rstest]
#[case(&[TopicField::Title])]
#[case(&[TopicField::Title, TopicField::Desc])]
#[case(&[TopicField::Narr, TopicField::Title, TopicField::Desc])]
fn test_topic_fields(#[case] fields: &[TopicField]) {
    init_logger();
    let topics = read_topics(fields);

    let qids: Vec<&str> = topics.iter().map(|t| t.qid.as_str()).collect();
    assert_eq!(qids, vec!["401", "402"]);

    for topic in topics.iter() {
        for field in TopicField::ALL {
            assert_eq!(
                topic.field(field).is_some(),
                fields.contains(&field),
                "field {} of topic {}",
                field,
                topic.qid
            );
        }
    }

    assert_eq!(
        topics[0].text(TopicField::Title).unwrap(),
        "foreign minorities, Germany"
    );
    if fields.contains(&TopicField::Desc) {
        assert_eq!(
            topics[1].text(TopicField::Desc).unwrap(),
            "What is happening in the field of behavioral genetics?"
        );
    }
    if fields.contains(&TopicField::Narr) {
        assert_eq!(
            topics[0].text(TopicField::Narr).unwrap(),
            "A relevant document will focus on the causes of the lack of \
             integration in a significant way."
        );
    }
}

#[test]
fn test_single_line_topic() {
    let fixtures = Fixtures::new();
    let path = fixtures.write(
        "topics.txt",
        "<num> Number: 1\n<title> hello world\n<desc> Description: a query\n",
    );

    let topics: Vec<Topic> = scan_topics(&path, &[TopicField::Title, TopicField::Desc])
        .unwrap()
        .map(|t| t.unwrap())
        .collect();
    assert_eq!(topics.len(), 1);
    assert_eq!(topics[0].qid, "1");
    assert_eq!(topics[0].field(TopicField::Title).unwrap(), ["hello", "world"]);
    assert_eq!(topics[0].field(TopicField::Desc).unwrap(), ["a", "query"]);
}

#[test]
fn test_topics_serialize() {
    let topics = read_topics(&[TopicField::Title]);
    let json = serde_json::to_value(&topics[1]).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"qid": "402", "fields": {"title": ["behavioral", "genetics"]}})
    );
}

#[test]
fn test_topics_tsv() {
    let fixtures = Fixtures::new();
    let path = fixtures.write("queries.tsv", "1\tfirst query\n2\tsecond query\n");

    let pairs: Vec<(String, String)> = scan_topics_tsv(&path, &TsvOptions::default())
        .unwrap()
        .map(|p| p.unwrap())
        .collect();
    assert_eq!(pairs[1], ("2".to_string(), "second query".to_string()));

    let bad = fixtures.write("bad.tsv", "1\tfirst query\n2 second query\n");
    let results: Vec<_> = scan_topics_tsv(&bad, &TsvOptions::default())
        .unwrap()
        .collect();
    assert_eq!(results.len(), 2);
    assert!(matches!(results[1], Err(Error::Format { line: 2, .. })));
}

#[rstest]
#[case(false)]
#[case(true)]
fn test_collection(#[case] compressed: bool) {
    init_logger();
    let fixtures = Fixtures::new();
    let path = if compressed {
        fixtures.write_gz("collection.txt.gz", COLLECTION.as_bytes())
    } else {
        fixtures.write("collection.txt", COLLECTION)
    };

    let documents: Vec<CollectionDocument> = scan_collection(&path, &CollectionOptions::default())
        .unwrap()
        .map(|d| d.unwrap())
        .collect();

    assert_eq!(
        documents,
        vec![
            CollectionDocument {
                docid: "FBIS3-1".to_string(),
                text: "Language: EnglishArticle Type: BFN".to_string()
            },
            CollectionDocument {
                docid: "FBIS3-2".to_string(),
                text: "seconddocument".to_string()
            },
        ]
    );
}

#[test]
fn test_collection_concatenation() {
    let fixtures = Fixtures::new();
    let path = fixtures.write(
        "collection.txt",
        "<DOCNO>D1</DOCNO>\n<TEXT>\nhello\nworld\n</TEXT>\n\n\n",
    );

    let documents: Vec<CollectionDocument> = scan_collection(&path, &CollectionOptions::default())
        .unwrap()
        .map(|d| d.unwrap())
        .collect();
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].docid, "D1");
    assert_eq!(documents[0].text, "helloworld");
}

#[test]
fn test_collection_invalid_utf8() {
    let fixtures = Fixtures::new();
    let path = fixtures.write_gz(
        "collection.gz",
        b"<DOCNO>D1</DOCNO>\n<TEXT>\nok\n\xc3\x28\n</TEXT>\n",
    );

    let mut skip = scan_collection(&path, &CollectionOptions::default()).unwrap();
    assert_eq!(skip.next().unwrap().unwrap().text, "ok");
    assert!(skip.next().is_none());
    assert_eq!(skip.skipped_lines(), 1);

    let strict = CollectionOptions {
        decode_policy: DecodePolicy::Strict,
    };
    match scan_collection(&path, &strict).unwrap().next() {
        Some(Err(Error::Decode { origin, line })) => {
            assert_eq!(origin, Some(path.clone()));
            assert_eq!(line, 4);
        }
        r => panic!("Expected a decoding error, got {:?}", r),
    }
}

#[test]
fn test_collection_tsv() {
    let fixtures = Fixtures::new();
    let path = fixtures.write("collection.tsv", "d1|text one\nd2|text two\n");
    let options = TsvOptions {
        delimiter: "|".to_string(),
    };

    let pairs: Vec<(String, String)> = scan_collection_tsv(&path, &options)
        .unwrap()
        .map(|p| p.unwrap())
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("d1".to_string(), "text one".to_string()),
            ("d2".to_string(), "text two".to_string())
        ]
    );
}
