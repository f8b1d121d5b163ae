//! Prompt template pools for the label generators, English and Chinese.
//!
//! `[content]`/`[content1]`/`[content2]` placeholders are substituted by the
//! generators; `<bbox>…</bbox>` wraps pixel coordinates in positional
//! prompts.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lang {
    En,
    Cn,
}

impl Lang {
    /// Language of a sample, inferred from its image path. English corpora
    /// carry an `en_` segment in their directory layout.
    pub fn from_image_path(path: &str) -> Lang {
        if path.contains("en_") {
            Lang::En
        } else {
            Lang::Cn
        }
    }

    pub fn yes(&self) -> &'static str {
        match self {
            Lang::En => "Yes",
            Lang::Cn => "是",
        }
    }

    pub fn no(&self) -> &'static str {
        match self {
            Lang::En => "No",
            Lang::Cn => "否",
        }
    }
}

/// Structural QA prompts, one per question kind in kind order.
pub fn structured(lang: Lang) -> &'static [&'static str; 7] {
    match lang {
        Lang::En => &STRUCTURED_EN,
        Lang::Cn => &STRUCTURED_CN,
    }
}

/// Whole-map parsing prompts.
pub fn parse_full(lang: Lang) -> &'static [&'static str] {
    match lang {
        Lang::En => &PARSE_FULL_EN,
        Lang::Cn => &PARSE_FULL_CN,
    }
}

/// Subtree parsing prompts ("[content]" is the subtree theme).
pub fn parse_part(lang: Lang) -> &'static [&'static str] {
    match lang {
        Lang::En => &PARSE_PART_EN,
        Lang::Cn => &PARSE_PART_CN,
    }
}

/// Positional QA prompts, one per question kind in kind order.
pub fn pos_vqa(lang: Lang) -> &'static [&'static str; 11] {
    match lang {
        Lang::En => &POS_VQA_EN,
        Lang::Cn => &POS_VQA_CN,
    }
}

/// Region-scoped parsing prompts ("[content]" is the region box).
pub fn pos_parse(lang: Lang) -> &'static [&'static str] {
    match lang {
        Lang::En => &POS_PARSE_EN,
        Lang::Cn => &POS_PARSE_CN,
    }
}

static STRUCTURED_EN: [&str; 7] = [
    "Please describe the central theme of the mind map depicted in the provided image.",
    "Please identify and return the parent node of the node labeled \"[content]\" in the mind map.",
    "Please identify and return all child nodes of the node labeled \"[content]\" in the mind map.",
    "Please determine and inform which level the node labeled \"[content]\" is located on in the mind map.",
    "Please list all the nodes contained on the [content]-th level of the mind map.",
    "Please determine and inform whether the nodes labeled \"[content1]\" and \"[content2]\" constitute a parent-child relationship in the mind map.",
    "Please determine and inform whether the nodes labeled \"[content1]\" and \"[content2]\" constitute a sibling relationship in the mind map.",
];

static STRUCTURED_CN: [&str; 7] = [
    "请描述在提供的图片中思维导图的核心主题。",
    "请识别并返回在思维导图中标记为“[content]”的节点的父节点。",
    "请识别并返回在思维导图中标记为“[content]”的节点的所有子节点。",
    "请确定并告知在思维导图中标记为“[content]”的节点位于哪一层级。",
    "请列出在思维导图中第[content]层包含的所有节点。",
    "请判断并告知在思维导图中标记为“[content1]”和“[content2]”的节点是否构成父子关系。",
    "请判断并告知在思维导图中标记为“[content1]”和“[content2]”的节点是否构成兄弟关系。",
];

static PARSE_FULL_EN: [&str; 10] = [
    "Convert this mind map into a clear structured data format.",
    "Analyze the image and describe in detail the levels and relationships of information in the mind map.",
    "Identify and output all the nodes and their interconnections in this mind map image.",
    "Please list in detail the topics, subtopics, and their connections in the mind map.",
    "Organize the content of this mind map into structured textual information.",
    "Present the information from the mind map in the image in the form of tree-structured data.",
    "Parse this mind map and present its content in a structured way.",
    "Extract the key points from this mind map and construct their hierarchical relationship.",
    "Convert the mind map information in the image into a readable structured output.",
    "Identify the elements of the mind map in this image and arrange them into structured data according to their intrinsic logical relationships.",
];

static PARSE_FULL_CN: [&str; 10] = [
    "将这张思维导图转化为清晰的结构化数据格式。",
    "分析图像并详细描述思维导图中的信息层级和关系。",
    "识别并输出此思维导图图像中所有节点及其相互连接的结构。",
    "请详细列出思维导图中的主题、子主题和它们之间的联系。",
    "把这幅思维导图的内容整理成结构化的文本信息。",
    "将图中的思维导图信息以树状结构数据的形式展现出来。",
    "解析这张思维导图，并将其内容以结构化的方式呈现。",
    "提炼出这幅思维导图中的关键点，并构建它们之间的层次关系。",
    "将图像中的思维导图信息转换为可读的结构化输出。",
    "识别这张图中的思维导图元素，并按照其内在逻辑关系排列成结构化数据。",
];

static PARSE_PART_EN: [&str; 10] = [
    "Parse a mind map subgraph with the theme '[content]' and present its content in a structured way.",
    "Extract the part of the mind map centered around '[content]' and present its information in a structured data format.",
    "Convert the mind map subgraph with '[content]' as the central node into clear structured data.",
    "List in detail the topics, subtopics, and their connections in the mind map subgraph centered around '[content]'.",
    "Organize the content of the mind map subgraph centered on '[content]' into structured textual information.",
    "Analyze the mind map subgraph with '[content]' as the root node and present its tree-structured data.",
    "Identify all nodes and their connections in the mind map subgraph with the theme '[content]'.",
    "Extract the key points from the mind map subgraph centered on '[content]' and construct their hierarchical relationship.",
    "Convert the information from the mind map subgraph with the theme '[content]' into a readable structured output.",
    "Identify the elements of the mind map subgraph with '[content]' as the core and arrange them into structured data according to their intrinsic logical relationships.",
];

static PARSE_PART_CN: [&str; 10] = [
    "解析以“[content]”为主题的思维导图子图，并将其内容以结构化的方式呈现。",
    "提取以“[content]”为中心的思维导图部分，并以结构化数据格式展示其信息。",
    "将以“[content]”为核心节点的思维导图子图转化为清晰的结构化数据。",
    "详细列出以“[content]”为中心的思维导图子图的主题、子主题及其相互关系。",
    "把以“[content]”为中心的思维导图内容整理成结构化的文本信息。",
    "分析以“[content]”为根节点的思维导图子图，呈现其树状结构数据。",
    "识别以“[content]”为主题的思维导图子图中的所有节点及其连接关系。",
    "提炼出以“[content]”为中心的思维导图子图的关键点，并构建层次关系。",
    "将以“[content]”为主题的思维导图子图信息转换为可读的结构化输出。",
    "识别以“[content]”为核心的思维导图子图元素，并按其逻辑关系排列成结构化数据。",
];

static POS_VQA_EN: [&str; 11] = [
    "Identify and return the text of the node within the bounding box <bbox>[content]</bbox>.",
    "Determine and inform which level the node within the bounding box <bbox>[content]</bbox> is located on.",
    "Identify and return the parent node of the node within the bounding box <bbox>[content]</bbox>.",
    "Identify and return all child nodes of the node within the bounding box <bbox>[content]</bbox>.",
    "Determine and inform whether the nodes within the bounding boxes <bbox>[content1]</bbox> and <bbox>[content2]</bbox> have a parent-child relationship.",
    "Determine and inform whether the nodes within the bounding boxes <bbox>[content1]</bbox> and <bbox>[content2]</bbox> have a sibling relationship.",
    "Determine and inform how many nodes are contained within the bounding box <bbox>[content]</bbox>.",
    "Identify and return the bounding box of the node labeled '[content]' in the mind map.",
    "Identify and return the parent node and its bounding box of the node labeled '[content]' in the mind map.",
    "Identify and return all child nodes and their bounding boxes of the node labeled '[content]' in the mind map.",
    "Identify and return the bounding box of the subgraph in the mind map with the theme '[content]'.",
];

static POS_VQA_CN: [&str; 11] = [
    "请识别并返回边界框<bbox>[content]</bbox>内的节点的文本。",
    "请确定并告知边界框<bbox>[content]</bbox>内的节点位于哪一层级。",
    "请识别并返回边界框<bbox>[content]</bbox>内的节点的父节点。",
    "请识别并返回边界框<bbox>[content]</bbox>内的节点的所有子节点。",
    "请判断并告知边界框<bbox>[content1]</bbox>内的节点和边界框<bbox>[content2]</bbox>内的节点是否构成父子关系。",
    "请判断并告知边界框<bbox>[content1]</bbox>内的节点和边界框<bbox>[content2]</bbox>内的节点是否构成兄弟关系。",
    "请确定并告知边界框<bbox>[content]</bbox>内共有几个节点。",
    "请识别并返回在思维导图中标记为“[content]”的节点的边界框。",
    "请识别并返回在思维导图中标记为“[content]”的节点的父节点及其边界框。",
    "请识别并返回在思维导图中标记为“[content]”的节点的所有子节点及其边界框。",
    "请识别并返回以“[content]”为主题的思维导图子图的边界框。",
];

static POS_PARSE_EN: [&str; 10] = [
    "Parse the mind map subgraph within the bounding box <bbox>[content]</bbox> and present its content in a structured way.",
    "Extract the section of the mind map within the bounding box <bbox>[content]</bbox> and present its information in a structured data format.",
    "Convert the mind map subgraph inside the bounding box <bbox>[content]</bbox> into clear structured data.",
    "List in detail the topics, subtopics, and their connections in the mind map subgraph within the bounding box <bbox>[content]</bbox>.",
    "Organize the content of the mind map subgraph within the bounding box <bbox>[content]</bbox> into structured textual information.",
    "Analyze the mind map subgraph within the bounding box <bbox>[content]</bbox> and present its tree-structured data.",
    "Identify all nodes and their connections in the mind map subgraph within the bounding box <bbox>[content]</bbox>.",
    "Extract the key points from the mind map subgraph inside the bounding box <bbox>[content]</bbox> and construct their hierarchical relationship.",
    "Convert the information from the mind map subgraph within the bounding box <bbox>[content]</bbox> into a readable structured output.",
    "Identify the elements of the mind map subgraph within the bounding box <bbox>[content]</bbox> and arrange them into structured data according to their intrinsic logical relationships.",
];

static POS_PARSE_CN: [&str; 10] = [
    "解析边界框<bbox>[content]</bbox>内的思维导图子图，并将其内容以结构化的方式呈现。",
    "提取边界框<bbox>[content]</bbox>内的思维导图部分，并以结构化数据格式展示其信息。",
    "将边界框<bbox>[content]</bbox>内的思维导图子图转化为清晰的结构化数据。",
    "详细列出边界框<bbox>[content]</bbox>内的思维导图子图的主题、子主题及其相互关系。",
    "把边界框<bbox>[content]</bbox>内的思维导图内容整理成结构化的文本信息。",
    "分析边界框<bbox>[content]</bbox>内的思维导图子图，呈现其树状结构数据。",
    "识别边界框<bbox>[content]</bbox>内的思维导图子图中的所有节点及其连接关系。",
    "提炼出边界框<bbox>[content]</bbox>内的思维导图子图的关键点，并构建层次关系。",
    "将边界框<bbox>[content]</bbox>内的思维导图子图信息转换为可读的结构化输出。",
    "识别边界框<bbox>[content]</bbox>内的思维导图子图元素，并按其逻辑关系排列成结构化数据。",
];
