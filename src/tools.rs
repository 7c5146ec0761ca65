// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of mermaid-sync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Starter templates and insertable snippets per diagram type.

use crate::model::DiagramType;

/// One palette entry. `snippet` starts with a newline and its own indentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolItem {
    pub label: &'static str,
    pub snippet: &'static str,
    pub description: &'static str,
}

const fn tool(label: &'static str, snippet: &'static str, description: &'static str) -> ToolItem {
    ToolItem {
        label,
        snippet,
        description,
    }
}

const SEQUENCE_TOOLS: &[ToolItem] = &[
    tool("Actor", "\n    actor NewActor as \"New Actor\"", "Add a human participant"),
    tool("Participant", "\n    participant NewPart as \"Component\"", "Add a system or service"),
    tool(
        "Database",
        "\n    participant DB as \"Database\"\n    Note over DB: Storage",
        "Add a database",
    ),
    tool("Sync message", "\n    Alice->>Bob: Synchronous message", "Blocking call"),
    tool("Async message", "\n    Alice-)Bob: Asynchronous message", "Non-blocking call"),
    tool("Note", "\n    Note right of Alice: Important note", "Annotation"),
    tool(
        "Loop",
        "\n    loop Every minute\n        Alice->>Bob: Ping\n    end",
        "Repetition",
    ),
    tool(
        "Alternative",
        "\n    alt Success\n        Alice->>Bob: OK\n    else Failure\n        Alice->>Bob: Fail\n    end",
        "Condition",
    ),
];

const CLASS_TOOLS: &[ToolItem] = &[
    tool(
        "Class",
        "\n    class NewClass {\n      +String attribute\n      +method()\n    }",
        "Define a class",
    ),
    tool(
        "Interface",
        "\n    class IService {\n      <<interface>>\n      +execute()\n    }",
        "Define an interface",
    ),
    tool("Inheritance", "\n    ClassA <|-- ClassB : Extends", "Parent-child relation"),
    tool("Composition", "\n    ClassA *-- ClassB : Composes", "Strong ownership"),
    tool("Aggregation", "\n    ClassA o-- ClassB : Aggregates", "Weak ownership"),
];

const FLOWCHART_TOOLS: &[ToolItem] = &[
    tool("Start/End", "\n    Start((Start))", "Round node"),
    tool("Process", "\n    Proc[Action]", "Rectangle"),
    tool("Decision", "\n    Dec{Condition?}", "Diamond"),
    tool("Data", "\n    Data[(Database)]", "Cylinder"),
    tool("Link", "\n    A --> B", "Arrow"),
    tool("Subgraph", "\n    subgraph Group\n    A --> B\n    end", "Group elements"),
];

const USE_CASE_TOOLS: &[ToolItem] = &[
    tool("Actor", "\n    User((Actor))", "System user"),
    tool("Use case", "\n    UC1(Sign in)", "Use case"),
    tool("Link", "\n    User --> UC1", "Simple association"),
    tool("Include", "\n    UC1 -.->|<<include>>| UC2", "Mandatory inclusion"),
    tool("Extend", "\n    UC2 -.->|<<extend>>| UC1", "Optional extension"),
    tool("System", "\n    subgraph System\n    UC1\n    end", "System boundary"),
];

const PACKAGE_TOOLS: &[ToolItem] = &[
    tool("Package", "\n    namespace Core {\n      class Utils\n    }", "Logical group"),
    tool("Class", "\n    class MyClass", "Contained element"),
    tool("Dependency", "\n    PkgA ..> PkgB : import", "Relation"),
];

const DEPLOYMENT_TOOLS: &[ToolItem] = &[
    tool("Node", "\n    Server[Web Server]", "Hardware or environment"),
    tool("Database", "\n    DB[(PostgreSQL)]", "Persistent storage"),
    tool("Artifact", "\n    App[/App.jar/]", "Software artifact"),
    tool("Link", "\n    Server -- TCP/IP --> DB", "Network connection"),
    tool("Cloud", "\n    subgraph Cloud\n    Server\n    end", "Network zone"),
];

/// Palette for `kind`; types without their own palette use the flowchart one.
pub fn tools_for(kind: DiagramType) -> &'static [ToolItem] {
    match kind {
        DiagramType::Sequence => SEQUENCE_TOOLS,
        DiagramType::Class => CLASS_TOOLS,
        DiagramType::UseCase => USE_CASE_TOOLS,
        DiagramType::Package => PACKAGE_TOOLS,
        DiagramType::Deployment => DEPLOYMENT_TOOLS,
        DiagramType::Flowchart
        | DiagramType::State
        | DiagramType::Er
        | DiagramType::Gantt
        | DiagramType::Mindmap
        | DiagramType::Pie => FLOWCHART_TOOLS,
    }
}

const FLOWCHART_TEMPLATE: &str = "graph TD
    A[Start] --> B{Is it valid?}
    B -->|Yes| C[Process]
    B -->|No| D[Reject]
    C --> E[End]
    D --> E";

const SEQUENCE_TEMPLATE: &str = "sequenceDiagram
    autonumber
    participant Client
    participant API as API Gateway
    participant Service as Auth Service
    participant DB as Database

    Client->>API: Login Request (User, Pass)
    activate API
    API->>Service: Validate Credentials
    activate Service
    Service->>DB: Query User
    activate DB
    DB-->>Service: User Data
    deactivate DB
    Service-->>API: Token Generated
    deactivate Service
    API-->>Client: 200 OK (Token)
    deactivate API";

const CLASS_TEMPLATE: &str = "classDiagram
    class User {
      +String username
      +String password
      +login()
      +logout()
    }
    class Admin {
      +grantPermission()
    }
    User <|-- Admin : inherits";

const STATE_TEMPLATE: &str = "stateDiagram-v2
    [*] --> Idle
    Idle --> Processing : Submit
    Processing --> Success : OK
    Processing --> Error : Fail
    Success --> [*]
    Error --> Idle : Retry";

const ER_TEMPLATE: &str = "erDiagram
    CUSTOMER ||--o{ ORDER : places
    ORDER ||--|{ LINE-ITEM : contains
    PRODUCT ||--o{ LINE-ITEM : \"included in\"";

const GANTT_TEMPLATE: &str = "gantt
    title Project Timeline
    dateFormat YYYY-MM-DD
    section Design
    Prototype : 2023-01-01, 30d
    Test      : 20d
    section Dev
    Frontend  : 2023-02-01, 45d
    Backend   : 2023-02-15, 60d";

const MINDMAP_TEMPLATE: &str = "mindmap
    root((Project))
      Development
        Frontend
        Backend
      Marketing
        SEO
        Social Media";

const USE_CASE_TEMPLATE: &str = "graph LR
    User((User))
    Admin((Administrator))

    subgraph System
        UC1(Sign in)
        UC2(Manage profiles)
        UC3(View reports)
    end

    User --> UC1
    User --> UC3
    Admin --> UC1
    Admin --> UC2
    UC2 -.->|<<include>>| UC1";

const PACKAGE_TEMPLATE: &str = "classDiagram
    namespace Presentation {
      class UIController
      class ViewModel
    }
    namespace BusinessLogic {
      class Service
      class DomainModel
    }
    namespace DataAccess {
      class Repository
      class DatabaseContext
    }

    Presentation ..> BusinessLogic
    BusinessLogic ..> DataAccess";

const DEPLOYMENT_TEMPLATE: &str = "graph TD
    subgraph Cloud [AWS Cloud]
        node1[Load Balancer]
        subgraph Cluster [App Cluster]
            node2[App Server 1]
            node3[App Server 2]
        end
        db[(Primary DB)]
        cache[(Redis Cache)]
    end

    client((Client Browser)) -- HTTPS --> node1
    node1 -- HTTP --> node2
    node1 -- HTTP --> node3
    node2 --> db
    node3 --> db
    node2 -.-> cache";

/// Starter source for `kind`. Pie charts have none.
pub fn template_for(kind: DiagramType) -> Option<&'static str> {
    let template = match kind {
        DiagramType::Flowchart => FLOWCHART_TEMPLATE,
        DiagramType::Sequence => SEQUENCE_TEMPLATE,
        DiagramType::Class => CLASS_TEMPLATE,
        DiagramType::State => STATE_TEMPLATE,
        DiagramType::Er => ER_TEMPLATE,
        DiagramType::Gantt => GANTT_TEMPLATE,
        DiagramType::Mindmap => MINDMAP_TEMPLATE,
        DiagramType::UseCase => USE_CASE_TEMPLATE,
        DiagramType::Package => PACKAGE_TEMPLATE,
        DiagramType::Deployment => DEPLOYMENT_TEMPLATE,
        DiagramType::Pie => return None,
    };
    Some(template)
}
